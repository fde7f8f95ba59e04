use tf_provider::value::Value;

use super::base::{
    self, bool_property_or_null, ensure_feature_is_enabled, property_or_empty, property_or_null,
    set_known, set_known_bool, set_non_empty,
};
use super::{MappableAction, keys};
use crate::error::Result;
use crate::model::DeploymentAction;
use crate::plan::{carry, default_to};
use crate::resources::deployment_process::state::{
    ActionBase, PackageActionState, WindowsServiceActionState, WindowsServiceState,
};
use crate::value::known;

const DEFAULT_SERVICE_ACCOUNT: &str = "LocalSystem";
const DEFAULT_START_MODE: &str = "auto";

fn apply_windows_service(action: &mut DeploymentAction, service: &WindowsServiceState) {
    ensure_feature_is_enabled(action, keys::FEATURE_WINDOWS_SERVICE);
    set_known_bool(action, keys::WINDOWS_SERVICE_CREATE_OR_UPDATE, &service.create_or_update_service);
    set_non_empty(action, keys::WINDOWS_SERVICE_NAME, &service.service_name);
    set_non_empty(action, keys::WINDOWS_SERVICE_EXECUTABLE_PATH, &service.executable_path);
    set_non_empty(action, keys::WINDOWS_SERVICE_ACCOUNT, &service.service_account);
    set_non_empty(action, keys::WINDOWS_SERVICE_START_MODE, &service.start_mode);
    set_non_empty(
        action,
        keys::WINDOWS_SERVICE_CUSTOM_ACCOUNT_PASSWORD,
        &service.custom_account_password,
    );
    set_known(action, keys::WINDOWS_SERVICE_ARGUMENTS, &service.arguments);
    set_known(action, keys::WINDOWS_SERVICE_CUSTOM_ACCOUNT_NAME, &service.custom_account_name);
    set_known(action, keys::WINDOWS_SERVICE_DEPENDENCIES, &service.dependencies);
    set_known(action, keys::WINDOWS_SERVICE_DESCRIPTION, &service.description);
    set_known(action, keys::WINDOWS_SERVICE_DISPLAY_NAME, &service.display_name);
}

/// The password comes back from Octopus as a sensitive value, so state keeps what was planned.
fn windows_service_state(
    action: &DeploymentAction,
    prior: Option<&WindowsServiceState>,
) -> WindowsServiceState {
    let custom_account_password = prior
        .and_then(|prior| known(&prior.custom_account_password))
        .map_or(Value::Null, |password| Value::Value(password.clone()));

    WindowsServiceState {
        arguments: property_or_null(action, keys::WINDOWS_SERVICE_ARGUMENTS),
        create_or_update_service: bool_property_or_null(action, keys::WINDOWS_SERVICE_CREATE_OR_UPDATE),
        custom_account_name: property_or_null(action, keys::WINDOWS_SERVICE_CUSTOM_ACCOUNT_NAME),
        custom_account_password,
        dependencies: property_or_null(action, keys::WINDOWS_SERVICE_DEPENDENCIES),
        description: property_or_null(action, keys::WINDOWS_SERVICE_DESCRIPTION),
        display_name: property_or_null(action, keys::WINDOWS_SERVICE_DISPLAY_NAME),
        executable_path: property_or_empty(action, keys::WINDOWS_SERVICE_EXECUTABLE_PATH),
        service_account: property_or_null(action, keys::WINDOWS_SERVICE_ACCOUNT),
        service_name: property_or_empty(action, keys::WINDOWS_SERVICE_NAME),
        start_mode: property_or_null(action, keys::WINDOWS_SERVICE_START_MODE),
    }
}

fn plan_windows_service(
    planned: &mut WindowsServiceState,
    config: &WindowsServiceState,
    prior: Option<&WindowsServiceState>,
) {
    default_to(
        &mut planned.service_account,
        &config.service_account,
        DEFAULT_SERVICE_ACCOUNT.to_string(),
    );
    default_to(&mut planned.start_mode, &config.start_mode, DEFAULT_START_MODE.to_string());
    carry(
        &mut planned.create_or_update_service,
        &config.create_or_update_service,
        prior.map(|p| &p.create_or_update_service),
    );
    carry(
        &mut planned.custom_account_password,
        &config.custom_account_password,
        prior.map(|p| &p.custom_account_password),
    );
}

impl MappableAction for WindowsServiceActionState {
    const BLOCK: &'static str = "deploy_windows_service_action";
    const ACTION_TYPE: &'static str = "Octopus.WindowsService";

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn to_deployment_action(&self) -> Result<DeploymentAction> {
        let mut action = base::to_deployment_action(&self.base, Self::ACTION_TYPE);
        apply_windows_service(&mut action, &self.service);
        Ok(action)
    }

    fn to_state(action: &DeploymentAction, prior: Option<&Self>) -> Result<Self> {
        Ok(Self {
            base: base::to_state(action, prior.map(|p| &p.base)),
            service: windows_service_state(action, prior.map(|p| &p.service)),
        })
    }

    fn plan_kind(&mut self, config: &Self, prior: Option<&Self>) {
        plan_windows_service(&mut self.service, &config.service, prior.map(|p| &p.service));
    }
}

impl MappableAction for PackageActionState {
    const BLOCK: &'static str = "deploy_package_action";
    const ACTION_TYPE: &'static str = "Octopus.TentaclePackage";

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn to_deployment_action(&self) -> Result<DeploymentAction> {
        let mut action = base::to_deployment_action(&self.base, Self::ACTION_TYPE);
        if let Some(service) = known(&self.windows_service) {
            apply_windows_service(&mut action, service);
        }
        Ok(action)
    }

    fn to_state(action: &DeploymentAction, prior: Option<&Self>) -> Result<Self> {
        let prior_service = prior.and_then(|p| known(&p.windows_service));
        let windows_service = if action.property(keys::WINDOWS_SERVICE_NAME).is_some() {
            Value::Value(windows_service_state(action, prior_service))
        } else {
            Value::Null
        };
        Ok(Self {
            base: base::to_state(action, prior.map(|p| &p.base)),
            windows_service,
        })
    }

    fn plan_kind(&mut self, config: &Self, prior: Option<&Self>) {
        if let (Value::Value(service), Value::Value(config_service)) =
            (&mut self.windows_service, &config.windows_service)
        {
            let prior_service = prior.and_then(|p| known(&p.windows_service));
            plan_windows_service(service, config_service, prior_service);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PropertyValue, SensitiveValue};
    use crate::value::string;

    fn service() -> WindowsServiceState {
        WindowsServiceState {
            executable_path: string("bin\\app.exe"),
            service_name: string("App"),
            service_account: string("_CUSTOM"),
            custom_account_name: string("svc-app"),
            custom_account_password: string("s3cret"),
            start_mode: string("delayed-auto"),
            ..Default::default()
        }
    }

    #[test]
    fn windows_service_enables_feature_and_writes_fields() {
        let state = WindowsServiceActionState {
            base: ActionBase {
                name: string("Install service"),
                ..Default::default()
            },
            service: service(),
        };
        let action = state.to_deployment_action().expect("map");
        assert_eq!(action.action_type, "Octopus.WindowsService");
        assert_eq!(
            action.property(keys::ENABLED_FEATURES),
            Some(keys::FEATURE_WINDOWS_SERVICE)
        );
        assert_eq!(action.property(keys::WINDOWS_SERVICE_NAME), Some("App"));
        assert_eq!(action.property(keys::WINDOWS_SERVICE_ACCOUNT), Some("_CUSTOM"));
        assert_eq!(
            action.property(keys::WINDOWS_SERVICE_CUSTOM_ACCOUNT_NAME),
            Some("svc-app")
        );
        assert_eq!(action.property(keys::WINDOWS_SERVICE_START_MODE), Some("delayed-auto"));
        assert!(action.property(keys::WINDOWS_SERVICE_DESCRIPTION).is_none());
    }

    #[test]
    fn password_is_kept_from_prior_state() {
        let state = WindowsServiceActionState {
            base: ActionBase {
                name: string("Install service"),
                ..Default::default()
            },
            service: service(),
        };
        let mut action = state.to_deployment_action().expect("map");
        action.properties.insert(
            keys::WINDOWS_SERVICE_CUSTOM_ACCOUNT_PASSWORD.to_string(),
            PropertyValue::Sensitive(SensitiveValue {
                has_value: true,
                new_value: None,
            }),
        );

        let read = WindowsServiceActionState::to_state(&action, Some(&state)).expect("read");
        assert_eq!(read.service.custom_account_password, string("s3cret"));
        let imported = WindowsServiceActionState::to_state(&action, None).expect("read");
        assert!(matches!(imported.service.custom_account_password, Value::Null));
    }

    #[test]
    fn package_action_reads_windows_service_only_when_configured() {
        let plain = PackageActionState {
            base: ActionBase {
                name: string("Deploy"),
                ..Default::default()
            },
            windows_service: Value::Null,
        };
        let action = plain.to_deployment_action().expect("map");
        assert!(action.property(keys::ENABLED_FEATURES).is_none());
        let read = PackageActionState::to_state(&action, None).expect("read");
        assert!(matches!(read.windows_service, Value::Null));

        let with_service = PackageActionState {
            windows_service: Value::Value(service()),
            ..plain
        };
        let action = with_service.to_deployment_action().expect("map");
        let read = PackageActionState::to_state(&action, None).expect("read");
        let Value::Value(read_service) = read.windows_service else {
            panic!("windows service expected");
        };
        assert_eq!(read_service.service_name, string("App"));
    }

    #[test]
    fn plan_defaults_service_account_and_start_mode() {
        let config = WindowsServiceActionState {
            base: ActionBase {
                name: string("Install service"),
                ..Default::default()
            },
            service: WindowsServiceState {
                executable_path: string("app.exe"),
                service_name: string("App"),
                ..Default::default()
            },
        };
        let mut planned = config.clone();
        planned.plan(&config, None);
        assert_eq!(planned.service.service_account, string("LocalSystem"));
        assert_eq!(planned.service.start_mode, string("auto"));
        assert!(matches!(planned.service.create_or_update_service, Value::Unknown));
    }
}
