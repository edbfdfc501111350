//! 服务注册与依赖校验的集成测试

use config::{Config, File, FileFormat};
use di_abstractions::{DependencyValidator, ServiceCollection};
use di_impl::{DependencyGraph, DependencyGraphBuilder, DependencyValidatorImpl, TypeCatalog};
use infrastructure_common::{
    ConfigurationError, ConstructorDescriptor, Lifetime, ServiceType, TypeDescriptor,
    ValidationOptions,
};
use infrastructure_composition::{
    RegistrationOptions, RegistrationStrategy, ServiceConfiguration, ServiceRegistrar,
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

mod services {
    pub const MODULE: &str = module_path!();

    pub trait OrderRepository: Send + Sync {}
    pub trait PaymentGateway: Send + Sync {}
    pub trait Notifier: Send + Sync {}

    pub struct SqlOrderRepository;
    pub struct StripeGateway;
    pub struct EmailNotifier;
    pub struct AuditingNotifier;
    pub struct OrderService;
}

mod cyclic {
    pub struct Left;
    pub struct Right;
}

use services::*;

fn service<T: ?Sized + 'static>() -> ServiceType {
    ServiceType::of::<T>()
}

fn order_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(TypeDescriptor::of::<dyn OrderRepository>())
        .with(TypeDescriptor::of::<dyn PaymentGateway>())
        .with(TypeDescriptor::of::<dyn Notifier>())
        .with(
            TypeDescriptor::of::<SqlOrderRepository>()
                .implements::<dyn OrderRepository>()
                .with_lifetime(Lifetime::Scoped)
                .with_constructor(
                    ConstructorDescriptor::new("connect").with_parameter::<String>(),
                ),
        )
        .with(
            TypeDescriptor::of::<StripeGateway>()
                .implements::<dyn PaymentGateway>()
                .with_lifetime(Lifetime::Singleton)
                .with_alias("stripe"),
        )
        .with(TypeDescriptor::of::<EmailNotifier>().implements::<dyn Notifier>())
        .with(
            TypeDescriptor::of::<OrderService>()
                .with_constructor(ConstructorDescriptor::new("empty"))
                .with_constructor(
                    ConstructorDescriptor::new("new")
                        .with_parameter::<dyn OrderRepository>()
                        .with_parameter::<dyn PaymentGateway>()
                        .with_parameter::<dyn Notifier>()
                        .with_parameter::<u32>(),
                ),
        )
}

fn unresolved(error: &infrastructure_common::DependencyError) -> Vec<String> {
    error
        .as_configuration()
        .map(|error| error.unresolved_type_names().to_vec())
        .unwrap_or_default()
}

#[test]
fn test_scan_build_and_validate() -> anyhow::Result<()> {
    init_test_logger();
    let catalog = order_catalog();
    let mut registrar = ServiceRegistrar::new(&catalog).with_graph_tracking();

    let added = registrar.scan_module(services::MODULE)?;
    assert_eq!(added, 4);
    registrar.validate()?;

    let graph = registrar.graph().expect("依赖图应已启用");
    assert_eq!(
        graph.dependencies_of(&service::<OrderService>()),
        vec![
            service::<dyn OrderRepository>(),
            service::<dyn PaymentGateway>(),
            service::<dyn Notifier>()
        ]
    );
    assert!(!graph.contains(&service::<u32>()));
    assert!(!graph.contains(&service::<String>()));

    let order = graph.topological_order()?;
    let position = |service_type: ServiceType| order.iter().position(|t| *t == service_type);
    let service_position = position(service::<OrderService>());
    for contract in graph.dependencies_of(&service::<OrderService>()) {
        assert!(position(contract) < service_position);
    }

    let registrations = registrar.collection().registrations();
    let repository = registrations
        .iter()
        .find(|registration| registration.service_type == service::<dyn OrderRepository>())
        .expect("仓储应已注册");
    assert_eq!(repository.lifetime, Lifetime::Scoped);
    Ok(())
}

#[test]
fn test_missing_registrations_are_reported_together() {
    init_test_logger();
    let catalog = order_catalog();
    let mut registrar = ServiceRegistrar::new(&catalog).with_graph_tracking();
    registrar
        .register_as_self(service::<OrderService>(), Lifetime::Transient)
        .unwrap();

    let error = registrar.validate().unwrap_err();

    let mut expected: Vec<String> = [
        service::<dyn OrderRepository>(),
        service::<dyn PaymentGateway>(),
        service::<dyn Notifier>(),
    ]
    .iter()
    .map(|service_type| service_type.name().to_string())
    .collect();
    expected.sort();
    assert_eq!(unresolved(&error), expected);

    let message = error.to_string();
    for name in &expected {
        assert!(message.contains(name.as_str()));
    }
}

#[test]
fn test_graph_only_validation() {
    init_test_logger();
    let catalog = order_catalog();
    let builder = DependencyGraphBuilder::new(&catalog);
    let mut graph = DependencyGraph::new();
    builder.register_type(Some(&mut graph), &service::<OrderService>()).unwrap();

    // 注册集只含 OrderService 自身，且校验器不认识任何构造函数
    let empty_catalog = TypeCatalog::new();
    let validator = DependencyValidatorImpl::new(&empty_catalog);
    let mut registrar = ServiceRegistrar::new(&empty_catalog);
    registrar
        .register_as_self(service::<OrderService>(), Lifetime::Transient)
        .unwrap();
    let (collection, _) = registrar.into_parts();

    let error = validator.validate(&collection, Some(&graph)).unwrap_err();
    assert_eq!(unresolved(&error).len(), 3);
}

#[test]
fn test_empty_registrations_are_rejected() {
    init_test_logger();
    let catalog = order_catalog();
    let mut registrar = ServiceRegistrar::new(&catalog).with_graph_tracking();
    let mut graph = DependencyGraph::new();
    DependencyGraphBuilder::new(&catalog)
        .register_type(Some(&mut graph), &service::<OrderService>())
        .unwrap();

    let error = registrar.validate().unwrap_err();
    assert_eq!(
        error.as_configuration(),
        Some(&ConfigurationError::EmptyRegistrations)
    );

    let error = DependencyValidatorImpl::new(&catalog)
        .validate(registrar.collection(), Some(&graph))
        .unwrap_err();
    assert!(error.is_configuration());

    assert_eq!(registrar.scan(&[]).unwrap(), 0);
}

#[test]
fn test_load_configuration_from_json() -> anyhow::Result<()> {
    init_test_logger();
    let catalog = order_catalog();
    let mut registrar = ServiceRegistrar::new(&catalog).with_graph_tracking();

    let configuration = ServiceConfiguration::from_json_str(
        r#"{
            "services": [
                { "serviceType": "OrderRepository", "implementationType": "SqlOrderRepository" },
                { "serviceType": "PaymentGateway", "implementationType": "stripe" },
                { "serviceType": "Notifier", "implementationType": "EmailNotifier", "lifetime": "Singleton" },
                { "serviceType": "OrderService", "implementationType": "OrderService", "lifetime": "scoped" }
            ]
        }"#,
    )?;

    assert_eq!(registrar.load_configuration(&configuration)?, 4);
    registrar.validate()?;

    let lifetimes: Vec<Lifetime> = registrar
        .collection()
        .registrations()
        .iter()
        .map(|registration| registration.lifetime)
        .collect();
    assert_eq!(
        lifetimes,
        vec![
            Lifetime::Scoped,
            Lifetime::Singleton,
            Lifetime::Singleton,
            Lifetime::Scoped
        ]
    );
    Ok(())
}

#[test]
fn test_load_configuration_from_config_section() -> anyhow::Result<()> {
    init_test_logger();
    let config = Config::builder()
        .add_source(File::from_str(
            r#"
            [registration]
            strategy = "as_self"
            default_lifetime = "singleton"
            track_dependency_graph = true

            [[di.services]]
            serviceType = "Notifier"
            implementationType = "EmailNotifier"
            "#,
            FileFormat::Toml,
        ))
        .build()?;

    let options = RegistrationOptions::from_config(&config, "registration")?;
    assert_eq!(options.strategy, RegistrationStrategy::AsSelf);

    let catalog = order_catalog();
    let mut registrar = ServiceRegistrar::new(&catalog).with_options(options);
    let configuration = ServiceConfiguration::from_config(&config, "di")?;
    assert_eq!(registrar.load_configuration(&configuration)?, 1);

    let registration = &registrar.collection().registrations()[0];
    assert_eq!(registration.service_type, service::<dyn Notifier>());
    assert_eq!(registration.lifetime, Lifetime::Singleton);
    assert!(registrar.graph().is_some());
    Ok(())
}

#[test]
fn test_invalid_configuration_record() {
    init_test_logger();
    let catalog = order_catalog();
    let mut registrar = ServiceRegistrar::new(&catalog);

    let configuration = ServiceConfiguration::from_value(serde_json::json!({
        "services": [
            { "serviceType": "", "implementationType": "EmailNotifier" }
        ]
    }))
    .unwrap();
    let error = registrar.load_configuration(&configuration).unwrap_err();
    assert!(matches!(
        error.as_configuration(),
        Some(ConfigurationError::InvalidRecord { index: 0, field: "serviceType", .. })
    ));

    let configuration = ServiceConfiguration::from_value(serde_json::json!({
        "services": [
            { "serviceType": "PaymentGateway", "implementationType": "EmailNotifier" }
        ]
    }))
    .unwrap();
    let error = registrar.load_configuration(&configuration).unwrap_err();
    assert!(matches!(
        error.as_configuration(),
        Some(ConfigurationError::IncompatibleImplementation { .. })
    ));
    assert!(registrar.collection().is_empty());
}

#[test]
fn test_decoration() {
    init_test_logger();
    let catalog = order_catalog().with(
        TypeDescriptor::of::<AuditingNotifier>()
            .implements::<dyn Notifier>()
            .with_constructor(ConstructorDescriptor::new("new").with_parameter::<dyn PaymentGateway>()),
    );
    let mut registrar = ServiceRegistrar::new(&catalog).with_graph_tracking();

    let error = registrar
        .decorate_type::<dyn Notifier, AuditingNotifier>()
        .unwrap_err();
    assert!(error.is_not_found());

    registrar
        .register_type::<dyn Notifier, EmailNotifier>(Lifetime::Singleton)
        .unwrap();
    registrar
        .decorate_type::<dyn Notifier, AuditingNotifier>()
        .unwrap();

    let registration = &registrar.collection().registrations()[0];
    assert_eq!(*registration.implementation_type(), service::<AuditingNotifier>());
    assert_eq!(registration.lifetime, Lifetime::Singleton);

    // 装饰器引入了新的依赖
    let error = registrar.validate().unwrap_err();
    assert_eq!(
        unresolved(&error),
        vec![service::<dyn PaymentGateway>().name().to_string()]
    );
}

#[test]
fn test_instances_satisfy_dependencies() {
    init_test_logger();
    let catalog = order_catalog();
    let mut registrar = ServiceRegistrar::new(&catalog).with_graph_tracking();

    registrar.register_instance::<dyn OrderRepository, _>(Arc::new(SqlOrderRepository));
    registrar.register_instance::<dyn PaymentGateway, _>(Arc::new(StripeGateway));
    registrar.register_instance::<dyn Notifier, _>(Arc::new(EmailNotifier));
    registrar
        .register_as_self(service::<OrderService>(), Lifetime::Scoped)
        .unwrap();

    registrar.validate().unwrap();
    assert!(registrar
        .collection()
        .is_registered(&service::<StripeGateway>()));
}

#[test]
fn test_cycle_detection_is_opt_in() {
    init_test_logger();
    let catalog = TypeCatalog::new()
        .with(
            TypeDescriptor::of::<cyclic::Left>()
                .with_constructor(ConstructorDescriptor::new("new").with_parameter::<cyclic::Right>()),
        )
        .with(
            TypeDescriptor::of::<cyclic::Right>()
                .with_constructor(ConstructorDescriptor::new("new").with_parameter::<cyclic::Left>()),
        );

    let mut registrar = ServiceRegistrar::new(&catalog).with_graph_tracking();
    registrar
        .register_as_self(service::<cyclic::Left>(), Lifetime::Transient)
        .unwrap();
    registrar
        .register_as_self(service::<cyclic::Right>(), Lifetime::Transient)
        .unwrap();
    registrar.validate().unwrap();

    let options = RegistrationOptions {
        track_dependency_graph: true,
        validation: ValidationOptions::default().with_cycle_detection(true),
        ..RegistrationOptions::default()
    };
    let registrar = registrar.with_options(options);
    let error = registrar.validate().unwrap_err();
    match error.as_configuration() {
        Some(ConfigurationError::CircularDependency { cycles }) => {
            assert_eq!(cycles.len(), 1);
            assert!(cycles[0].contains("Left"));
            assert!(cycles[0].contains("Right"));
        }
        other => panic!("期望循环依赖错误, 实际: {other:?}"),
    }

    let (_, graph) = registrar.into_parts();
    assert!(graph.expect("依赖图应已启用").topological_order().is_err());
}

#[test]
fn test_graphs_are_independent() {
    let catalog = order_catalog();
    let builder = DependencyGraphBuilder::new(&catalog);
    let mut first = DependencyGraph::new();
    let mut second = DependencyGraph::new();

    builder.register_type(Some(&mut first), &service::<OrderService>()).unwrap();
    builder.register_type(Some(&mut second), &service::<SqlOrderRepository>()).unwrap();

    let foreign = second.node_id(&service::<SqlOrderRepository>()).unwrap();
    let own = first.node_id(&service::<OrderService>()).unwrap();
    assert!(first.add_dependency(own, foreign).unwrap_err().is_invalid_argument());
    assert_eq!(first.edge_count(), 3);
    assert_eq!(second.edge_count(), 0);
}
