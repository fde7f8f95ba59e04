use tf_provider::value::Value;

use super::keys;
use crate::mappers::{plain_properties, properties_state};
use crate::model::{DeploymentAction, DeploymentActionContainer, GitDependency, PackageReference};
use crate::plan::{carry, default_to, is_null, recompute_if};
use crate::resources::deployment_process::state::{
    ActionBase, ActionTemplateState, ContainerState, Execution, GitDependencyState,
    NamedPackageState, PackageState,
};
use crate::value::{
    BoolValue, StringValue, block_list, blocks, bool_or, expand_list, expand_map, flatten_list,
    flatten_list_or_null, format_bool, known, non_empty, parse_bool, string, string_or_empty,
};

/// Kubernetes action types whose object status check is on unless stated otherwise.
const STATUS_CHECK_ACTION_TYPES: [&str; 6] = [
    "Octopus.KubernetesDeployContainers",
    "Octopus.KubernetesDeployRawYaml",
    "Octopus.KubernetesDeployService",
    "Octopus.KubernetesDeployIngress",
    "Octopus.KubernetesDeployConfigMap",
    "Octopus.Kustomize",
];

pub const DEFAULT_ACQUISITION_LOCATION: &str = "Server";
pub const DEFAULT_FEED_ID: &str = "feeds-builtin";

pub(super) fn to_deployment_action(base: &ActionBase, action_type: &str) -> DeploymentAction {
    let mut action = DeploymentAction::new(string_or_empty(&base.name), action_type);
    action.id = non_empty(&base.id).map(str::to_string);
    action.slug = non_empty(&base.slug).map(str::to_string);
    action.condition = string_or_empty(&base.condition);
    action.notes = string_or_empty(&base.notes);
    action.is_disabled = bool_or(&base.is_disabled, false);
    action.is_required = bool_or(&base.is_required, false);
    action.can_be_used_for_project_versioning = bool_or(&base.can_be_used_for_project_versioning, false);
    action.channels = expand_list(&base.channels);
    action.environments = expand_list(&base.environments);
    action.excluded_environments = expand_list(&base.excluded_environments);
    action.tenant_tags = expand_list(&base.tenant_tags);

    for (key, value) in expand_map(&base.properties) {
        action.set_property(&key, value);
    }

    if let Some(container) = known(&base.container) {
        action.container = DeploymentActionContainer {
            feed_id: non_empty(&container.feed_id).map(str::to_string),
            image: non_empty(&container.image).map(str::to_string),
        };
    }

    let features = expand_list(&base.features);
    if !features.is_empty() {
        action.set_property(keys::ENABLED_FEATURES, features.join(","));
    }

    if let Some(template) = known(&base.action_template) {
        set_known(&mut action, keys::TEMPLATE_ID, &template.id);
        set_known(&mut action, keys::TEMPLATE_VERSION, &template.version);
    }

    if let Some(dependency) = known(&base.git_dependency) {
        action.git_dependencies.push(GitDependency {
            name: String::new(),
            repository_uri: string_or_empty(&dependency.repository_uri),
            default_branch: string_or_empty(&dependency.default_branch),
            git_credential_type: string_or_empty(&dependency.git_credential_type),
            file_path_filters: expand_list(&dependency.file_path_filters),
            git_credential_id: non_empty(&dependency.git_credential_id).map(str::to_string),
        });
    }

    if let Some(primary) = known(&base.primary_package) {
        let reference = package_reference(primary, String::new());
        let download_on_tentacle = match reference.acquisition_location.as_str() {
            DEFAULT_ACQUISITION_LOCATION => "False".to_string(),
            other => other.to_string(),
        };
        action.set_property(keys::PACKAGE_DOWNLOAD_ON_TENTACLE, download_on_tentacle);
        if !reference.package_id.is_empty() {
            action.set_property(keys::PACKAGE_ID, reference.package_id.clone());
        }
        if !reference.feed_id.is_empty() {
            action.set_property(keys::PACKAGE_FEED_ID, reference.feed_id.clone());
        }
        action.packages.push(reference);
    }

    for named in blocks(&base.package) {
        let mut reference = package_reference(&named.package, string_or_empty(&named.name));
        reference.properties.insert(
            keys::PACKAGE_EXTRACT.to_string(),
            format_bool(bool_or(&named.extract_during_deployment, true)).to_string(),
        );
        action.packages.push(reference);
    }

    polyfill_status_check(&mut action);
    action
}

fn package_reference(package: &PackageState, name: String) -> PackageReference {
    PackageReference {
        id: non_empty(&package.id).map(str::to_string),
        name,
        package_id: string_or_empty(&package.package_id),
        feed_id: string_or_empty(&package.feed_id),
        acquisition_location: string_or_empty(&package.acquisition_location),
        properties: expand_map(&package.properties),
    }
}

pub(super) fn apply_execution(action: &mut DeploymentAction, execution: &Execution) {
    action.set_property(
        keys::RUN_ON_SERVER,
        format_bool(bool_or(&execution.run_on_server, false)),
    );
    action.worker_pool_id = string_or_empty(&execution.worker_pool_id);
    action.worker_pool_variable = string_or_empty(&execution.worker_pool_variable);
}

/// Base state of an API action. Sort orders are filled in by the process mapper.
pub(super) fn to_state(action: &DeploymentAction, prior: Option<&ActionBase>) -> ActionBase {
    let features = action
        .property(keys::ENABLED_FEATURES)
        .map(|features| {
            flatten_list(
                features
                    .split(',')
                    .map(str::trim)
                    .filter(|feature| !feature.is_empty()),
            )
        })
        .unwrap_or(Value::Null);

    let action_template = match action.property(keys::TEMPLATE_ID) {
        Some(id) => Value::Value(ActionTemplateState {
            id: string(id),
            version: action.property(keys::TEMPLATE_VERSION).map_or(Value::Null, string),
        }),
        None => Value::Null,
    };

    let container = if action.container.is_empty() {
        Value::Null
    } else {
        Value::Value(ContainerState {
            feed_id: optional_non_empty(action.container.feed_id.as_deref()),
            image: optional_non_empty(action.container.image.as_deref()),
        })
    };

    let git_dependency = action
        .git_dependencies
        .first()
        .map_or(Value::Null, |dependency| {
            Value::Value(GitDependencyState {
                repository_uri: string(dependency.repository_uri.as_str()),
                default_branch: string(dependency.default_branch.as_str()),
                git_credential_type: string(dependency.git_credential_type.as_str()),
                file_path_filters: flatten_list_or_null(&dependency.file_path_filters),
                git_credential_id: optional_non_empty(dependency.git_credential_id.as_deref()),
            })
        });

    let prior_primary = prior.and_then(|prior| known(&prior.primary_package));
    let primary_package = action
        .packages
        .iter()
        .find(|reference| reference.name.is_empty())
        .map_or(Value::Null, |reference| {
            Value::Value(package_state(reference, prior_primary))
        });

    let package = block_list(
        action
            .packages
            .iter()
            .filter(|reference| !reference.name.is_empty())
            .map(|reference| {
                let prior_named = prior.and_then(|prior| {
                    blocks(&prior.package)
                        .find(|named| known(&named.name).is_some_and(|name| *name == reference.name))
                });
                named_package_state(reference, prior_named)
            }),
    );

    ActionBase {
        can_be_used_for_project_versioning: Value::Value(action.can_be_used_for_project_versioning),
        channels: flatten_list(&action.channels),
        condition: string(action.condition.as_str()),
        environments: flatten_list(&action.environments),
        excluded_environments: flatten_list(&action.excluded_environments),
        features,
        id: string(action.id.clone().unwrap_or_default()),
        is_disabled: Value::Value(action.is_disabled),
        is_required: Value::Value(action.is_required),
        name: string(action.name.as_str()),
        notes: string(action.notes.as_str()),
        properties: properties_state(
            plain_properties(&action.properties),
            prior.map(|prior| &prior.properties),
        ),
        sort_order: Value::Null,
        computed_sort_order: Value::Null,
        slug: string(action.slug.clone().unwrap_or_default()),
        tenant_tags: flatten_list(&action.tenant_tags),
        container,
        action_template,
        git_dependency,
        primary_package,
        package,
    }
}

fn package_state(reference: &PackageReference, prior: Option<&PackageState>) -> PackageState {
    PackageState {
        acquisition_location: string(reference.acquisition_location.as_str()),
        feed_id: string(reference.feed_id.as_str()),
        id: string(reference.id.clone().unwrap_or_default()),
        package_id: string(reference.package_id.as_str()),
        properties: properties_state(
            reference.properties.clone(),
            prior.map(|prior| &prior.properties),
        ),
    }
}

fn named_package_state(
    reference: &PackageReference,
    prior: Option<&NamedPackageState>,
) -> NamedPackageState {
    let extract = reference
        .properties
        .get(keys::PACKAGE_EXTRACT)
        .map_or(true, |value| parse_bool(value));
    NamedPackageState {
        name: string(reference.name.as_str()),
        extract_during_deployment: Value::Value(extract),
        package: package_state(reference, prior.map(|prior| &prior.package)),
    }
}

pub(super) fn execution_to_state(action: &DeploymentAction) -> Execution {
    Execution {
        run_on_server: Value::Value(action.property(keys::RUN_ON_SERVER).is_some_and(parse_bool)),
        worker_pool_id: string(action.worker_pool_id.as_str()),
        worker_pool_variable: string(action.worker_pool_variable.as_str()),
    }
}

pub(super) fn plan_base(planned: &mut ActionBase, config: &ActionBase, prior: Option<&ActionBase>) {
    carry(&mut planned.id, &config.id, prior.map(|p| &p.id));
    carry(&mut planned.slug, &config.slug, prior.map(|p| &p.slug));
    carry(&mut planned.condition, &config.condition, prior.map(|p| &p.condition));
    carry(
        &mut planned.can_be_used_for_project_versioning,
        &config.can_be_used_for_project_versioning,
        prior.map(|p| &p.can_be_used_for_project_versioning),
    );
    carry(&mut planned.channels, &config.channels, prior.map(|p| &p.channels));
    carry(&mut planned.environments, &config.environments, prior.map(|p| &p.environments));
    carry(
        &mut planned.excluded_environments,
        &config.excluded_environments,
        prior.map(|p| &p.excluded_environments),
    );
    carry(&mut planned.tenant_tags, &config.tenant_tags, prior.map(|p| &p.tenant_tags));
    carry(&mut planned.features, &config.features, prior.map(|p| &p.features));
    carry(&mut planned.properties, &config.properties, prior.map(|p| &p.properties));
    carry(
        &mut planned.computed_sort_order,
        &config.computed_sort_order,
        prior.map(|p| &p.computed_sort_order),
    );
    default_to(&mut planned.is_disabled, &config.is_disabled, false);
    default_to(&mut planned.is_required, &config.is_required, false);
    default_to(&mut planned.notes, &config.notes, String::new());

    if is_null(&config.sort_order) {
        let prior_sort_order = prior.and_then(|p| known(&p.sort_order)).copied();
        planned.sort_order = Value::Value(prior_sort_order.unwrap_or(-1));
    }

    if let (Value::Value(primary), Value::Value(config_primary)) =
        (&mut planned.primary_package, &config.primary_package)
    {
        let prior_primary = prior.and_then(|p| known(&p.primary_package));
        plan_package(primary, config_primary, prior_primary);
    }

    if is_null(&config.package) {
        planned.package = Value::Value(Vec::new());
    }
    if let (Value::Value(packages), Value::Value(config_packages)) =
        (&mut planned.package, &config.package)
    {
        for (planned_item, config_item) in packages.iter_mut().zip(config_packages) {
            let (Value::Value(named), Value::Value(config_named)) = (planned_item, config_item)
            else {
                continue;
            };
            let prior_named = prior.and_then(|p| {
                blocks(&p.package).find(|candidate| {
                    known(&candidate.name).is_some() && candidate.name == config_named.name
                })
            });
            default_to(
                &mut named.extract_during_deployment,
                &config_named.extract_during_deployment,
                true,
            );
            plan_package(
                &mut named.package,
                &config_named.package,
                prior_named.map(|p| &p.package),
            );
            if let Some(prior_named) = prior_named {
                let extract_changed =
                    named.extract_during_deployment != prior_named.extract_during_deployment;
                recompute_if(
                    &mut named.package.properties,
                    &config_named.package.properties,
                    extract_changed,
                );
            }
        }
    }
}

fn plan_package(planned: &mut PackageState, config: &PackageState, prior: Option<&PackageState>) {
    default_to(
        &mut planned.acquisition_location,
        &config.acquisition_location,
        DEFAULT_ACQUISITION_LOCATION.to_string(),
    );
    default_to(&mut planned.feed_id, &config.feed_id, DEFAULT_FEED_ID.to_string());
    carry(&mut planned.id, &config.id, prior.map(|p| &p.id));
    carry(&mut planned.properties, &config.properties, prior.map(|p| &p.properties));
}

pub(super) fn plan_execution(planned: &mut Execution, config: &Execution) {
    default_to(&mut planned.run_on_server, &config.run_on_server, false);
    default_to(&mut planned.worker_pool_id, &config.worker_pool_id, String::new());
    default_to(&mut planned.worker_pool_variable, &config.worker_pool_variable, String::new());
}

/// Appends `feature` to the enabled features unless it is already there.
pub fn ensure_feature_is_enabled(action: &mut DeploymentAction, feature: &str) {
    let current = action.property(keys::ENABLED_FEATURES).unwrap_or_default();
    if current.split(',').map(str::trim).any(|enabled| enabled == feature) {
        return;
    }
    let features = if current.is_empty() {
        feature.to_string()
    } else {
        format!("{current},{feature}")
    };
    action.set_property(keys::ENABLED_FEATURES, features);
}

/// Kubernetes deploy steps check object status unless told otherwise.
pub fn polyfill_status_check(action: &mut DeploymentAction) {
    if STATUS_CHECK_ACTION_TYPES.contains(&action.action_type.as_str())
        && !action.properties.contains_key(keys::KUBERNETES_STATUS_CHECK)
    {
        action.set_property(keys::KUBERNETES_STATUS_CHECK, format_bool(true));
    }
}

/// Writes the property when the attribute is known and non-empty.
pub(super) fn set_non_empty(action: &mut DeploymentAction, key: &str, value: &StringValue) {
    if let Some(value) = non_empty(value) {
        action.set_property(key, value);
    }
}

/// Writes the property whenever the attribute is known, even when empty.
pub(super) fn set_known(action: &mut DeploymentAction, key: &str, value: &StringValue) {
    if let Some(value) = known(value) {
        action.set_property(key, value.as_str());
    }
}

pub(super) fn set_known_bool(action: &mut DeploymentAction, key: &str, value: &BoolValue) {
    if let Some(value) = known(value) {
        action.set_property(key, format_bool(*value));
    }
}

/// Property text, or `""` when absent.
pub(super) fn property_or_empty(action: &DeploymentAction, key: &str) -> StringValue {
    string(action.property(key).unwrap_or_default())
}

/// Property text, or null when absent.
pub(super) fn property_or_null(action: &DeploymentAction, key: &str) -> StringValue {
    action.property(key).map_or(Value::Null, string)
}

pub(super) fn bool_property_or_null(action: &DeploymentAction, key: &str) -> BoolValue {
    action
        .property(key)
        .map_or(Value::Null, |value| Value::Value(parse_bool(value)))
}

fn optional_non_empty(value: Option<&str>) -> StringValue {
    value
        .filter(|value| !value.is_empty())
        .map_or(Value::Null, string)
}

#[cfg(test)]
mod tests {
    use crate::model::PropertyValue;
    use crate::model::SensitiveValue;

    use super::*;

    fn script_base(name: &str) -> ActionBase {
        ActionBase {
            name: string(name),
            ..Default::default()
        }
    }

    #[test]
    fn features_are_appended_once() {
        let mut action = DeploymentAction::new("Deploy", "Octopus.TentaclePackage");
        ensure_feature_is_enabled(&mut action, keys::FEATURE_WINDOWS_SERVICE);
        ensure_feature_is_enabled(&mut action, keys::FEATURE_SUBSTITUTE_IN_FILES);
        ensure_feature_is_enabled(&mut action, keys::FEATURE_WINDOWS_SERVICE);
        assert_eq!(
            action.property(keys::ENABLED_FEATURES),
            Some("Octopus.Features.WindowsService,Octopus.Features.SubstituteInFiles")
        );
    }

    #[test]
    fn status_check_polyfill_targets_kubernetes_deploy_types() {
        for action_type in STATUS_CHECK_ACTION_TYPES {
            let mut action = DeploymentAction::new("k8s", action_type);
            polyfill_status_check(&mut action);
            assert_eq!(action.property(keys::KUBERNETES_STATUS_CHECK), Some("True"));
        }

        let mut script = DeploymentAction::new("script", "Octopus.Script");
        polyfill_status_check(&mut script);
        assert!(script.property(keys::KUBERNETES_STATUS_CHECK).is_none());
    }

    #[test]
    fn status_check_polyfill_keeps_explicit_value() {
        let mut action = DeploymentAction::new("k8s", "Octopus.KubernetesDeployRawYaml");
        action.set_property(keys::KUBERNETES_STATUS_CHECK, "False");
        polyfill_status_check(&mut action);
        assert_eq!(action.property(keys::KUBERNETES_STATUS_CHECK), Some("False"));
    }

    #[test]
    fn primary_package_on_server_does_not_download_on_tentacle() {
        let mut base = script_base("Deploy");
        base.primary_package = Value::Value(PackageState {
            acquisition_location: string("Server"),
            feed_id: string("feeds-builtin"),
            package_id: string("app"),
            ..Default::default()
        });
        let action = to_deployment_action(&base, "Octopus.TentaclePackage");
        assert_eq!(action.property(keys::PACKAGE_DOWNLOAD_ON_TENTACLE), Some("False"));
        assert_eq!(action.property(keys::PACKAGE_ID), Some("app"));
        assert_eq!(action.packages.len(), 1);
        assert!(action.packages[0].name.is_empty());

        base.primary_package = Value::Value(PackageState {
            acquisition_location: string("ExecutionTarget"),
            package_id: string("app"),
            ..Default::default()
        });
        let action = to_deployment_action(&base, "Octopus.TentaclePackage");
        assert_eq!(
            action.property(keys::PACKAGE_DOWNLOAD_ON_TENTACLE),
            Some("ExecutionTarget")
        );
        assert!(action.property(keys::PACKAGE_FEED_ID).is_none());
    }

    #[test]
    fn git_credential_id_is_only_sent_when_set() {
        let mut base = script_base("Deploy");
        base.git_dependency = Value::Value(GitDependencyState {
            repository_uri: string("https://github.com/acme/infra.git"),
            default_branch: string("main"),
            git_credential_type: string("Anonymous"),
            ..Default::default()
        });
        let action = to_deployment_action(&base, "Octopus.Script");
        assert_eq!(action.git_dependencies[0].git_credential_id, None);
        let read = to_state(&action, None);
        let dependency = known(&read.git_dependency).expect("git dependency");
        assert!(matches!(dependency.git_credential_id, Value::Null));

        base.git_dependency = Value::Value(GitDependencyState {
            repository_uri: string("https://github.com/acme/infra.git"),
            default_branch: string("main"),
            git_credential_type: string("Library"),
            git_credential_id: string("GitCredentials-1"),
            ..Default::default()
        });
        let action = to_deployment_action(&base, "Octopus.Script");
        assert_eq!(
            action.git_dependencies[0].git_credential_id.as_deref(),
            Some("GitCredentials-1")
        );
        let read = to_state(&action, None);
        let dependency = known(&read.git_dependency).expect("git dependency");
        assert_eq!(dependency.git_credential_id, string("GitCredentials-1"));
    }

    #[test]
    fn named_packages_record_extraction() {
        let mut base = script_base("Deploy");
        base.package = block_list([NamedPackageState {
            name: string("tools"),
            extract_during_deployment: Value::Value(false),
            package: PackageState {
                package_id: string("tools"),
                ..Default::default()
            },
        }]);
        let action = to_deployment_action(&base, "Octopus.Script");
        assert_eq!(action.packages[0].name, "tools");
        assert_eq!(action.packages[0].properties[keys::PACKAGE_EXTRACT], "False");

        let state = to_state(&action, None);
        let named: Vec<_> = blocks(&state.package).collect();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].extract_during_deployment, Value::Value(false));
        assert!(matches!(state.primary_package, Value::Null));
    }

    #[test]
    fn sensitive_properties_never_reach_state() {
        let mut action = DeploymentAction::new("Deploy", "Octopus.Script");
        action.set_property("Visible", "yes");
        action.properties.insert(
            "Hidden".into(),
            PropertyValue::Sensitive(SensitiveValue {
                has_value: true,
                new_value: None,
            }),
        );
        let state = to_state(&action, None);
        let Value::Value(properties) = state.properties else {
            panic!("properties expected");
        };
        assert!(properties.contains_key("Visible"));
        assert!(!properties.contains_key("Hidden"));
    }

    #[test]
    fn empty_container_reads_as_null() {
        let action = DeploymentAction::new("Deploy", "Octopus.Script");
        let state = to_state(&action, None);
        assert!(matches!(state.container, Value::Null));
        assert!(matches!(state.features, Value::Null));
        assert!(matches!(state.properties, Value::Null));
    }

    #[test]
    fn plan_fills_defaults_and_unknowns_for_new_actions() {
        let config = script_base("Deploy");
        let mut planned = config.clone();
        plan_base(&mut planned, &config, None);
        assert!(matches!(planned.id, Value::Unknown));
        assert!(matches!(planned.slug, Value::Unknown));
        assert_eq!(planned.is_disabled, Value::Value(false));
        assert_eq!(planned.notes, Value::Value(String::new()));
        assert_eq!(planned.sort_order, Value::Value(-1));
    }

    #[test]
    fn plan_keeps_prior_identity() {
        let config = script_base("Deploy");
        let mut prior = config.clone();
        prior.id = string("Actions-1");
        prior.slug = string("deploy");
        prior.sort_order = Value::Value(2);
        let mut planned = config.clone();
        plan_base(&mut planned, &config, Some(&prior));
        assert_eq!(planned.id, string("Actions-1"));
        assert_eq!(planned.slug, string("deploy"));
        assert_eq!(planned.sort_order, Value::Value(2));
    }
}
