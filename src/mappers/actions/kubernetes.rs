use std::collections::BTreeMap;

use tf_provider::value::Value;

use super::base::{self, property_or_empty, set_non_empty};
use super::{MappableAction, keys};
use crate::error::{ProviderError, Result};
use crate::model::DeploymentAction;
use crate::plan::default_to;
use crate::resources::deployment_process::state::{ActionBase, KubernetesSecretActionState};
use crate::value::{bool_or, expand_map, format_bool, parse_bool};

impl MappableAction for KubernetesSecretActionState {
    const BLOCK: &'static str = "deploy_kubernetes_secret_action";
    const ACTION_TYPE: &'static str = "Octopus.KubernetesDeploySecret";

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn to_deployment_action(&self) -> Result<DeploymentAction> {
        let mut action = base::to_deployment_action(&self.base, Self::ACTION_TYPE);
        base::apply_execution(&mut action, &self.execution);
        set_non_empty(&mut action, keys::KUBERNETES_SECRET_NAME, &self.secret_name);
        action.set_property(
            keys::KUBERNETES_STATUS_CHECK,
            format_bool(bool_or(&self.kubernetes_object_status_check_enabled, true)),
        );
        if let Value::Value(_) = self.secret_values {
            let values = serde_json::to_string(&expand_map(&self.secret_values))?;
            action.set_property(keys::KUBERNETES_SECRET_VALUES, values);
        }
        Ok(action)
    }

    fn to_state(action: &DeploymentAction, prior: Option<&Self>) -> Result<Self> {
        let secret_values = match action.property(keys::KUBERNETES_SECRET_VALUES) {
            Some(raw) => {
                let values: BTreeMap<String, String> = serde_json::from_str(raw).map_err(|err| {
                    ProviderError::Mapping(format!(
                        "action '{}' has malformed secret values: {err}",
                        action.name
                    ))
                })?;
                Value::Value(values.into_iter().map(|(k, v)| (k, Value::Value(v))).collect())
            }
            None => Value::Null,
        };

        Ok(Self {
            base: base::to_state(action, prior.map(|p| &p.base)),
            execution: base::execution_to_state(action),
            secret_name: property_or_empty(action, keys::KUBERNETES_SECRET_NAME),
            secret_values,
            kubernetes_object_status_check_enabled: Value::Value(
                action
                    .property(keys::KUBERNETES_STATUS_CHECK)
                    .is_none_or(parse_bool),
            ),
        })
    }

    fn plan_kind(&mut self, config: &Self, _prior: Option<&Self>) {
        base::plan_execution(&mut self.execution, &config.execution);
        default_to(
            &mut self.kubernetes_object_status_check_enabled,
            &config.kubernetes_object_status_check_enabled,
            true,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::string;

    fn secret() -> KubernetesSecretActionState {
        KubernetesSecretActionState {
            base: ActionBase {
                name: string("Secret"),
                ..Default::default()
            },
            secret_name: string("db"),
            secret_values: Value::Value(BTreeMap::from([
                ("user".to_string(), string("admin")),
                ("password".to_string(), string("#{DbPassword}")),
            ])),
            ..Default::default()
        }
    }

    #[test]
    fn secret_values_travel_as_json() {
        let action = secret().to_deployment_action().expect("map");
        let raw = action.property(keys::KUBERNETES_SECRET_VALUES).expect("values");
        let decoded: serde_json::Value = serde_json::from_str(raw).expect("json");
        assert_eq!(decoded["user"], "admin");
        assert_eq!(action.property(keys::KUBERNETES_STATUS_CHECK), Some("True"));

        let read = KubernetesSecretActionState::to_state(&action, None).expect("read");
        assert_eq!(read.secret_values, secret().secret_values);
        assert_eq!(read.kubernetes_object_status_check_enabled, Value::Value(true));
    }

    #[test]
    fn malformed_secret_values_are_reported() {
        let mut action = secret().to_deployment_action().expect("map");
        action.set_property(keys::KUBERNETES_SECRET_VALUES, "not json");
        let err = KubernetesSecretActionState::to_state(&action, None).unwrap_err();
        assert!(err.to_string().contains("malformed secret values"));
    }
}
