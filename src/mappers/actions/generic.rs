use super::{MappableAction, base};
use crate::error::Result;
use crate::model::DeploymentAction;
use crate::resources::deployment_process::state::{ActionBase, GenericActionState};
use crate::value::{string, string_or_empty};

impl MappableAction for GenericActionState {
    const BLOCK: &'static str = "action";
    const ACTION_TYPE: &'static str = "";

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn to_deployment_action(&self) -> Result<DeploymentAction> {
        let mut action = base::to_deployment_action(&self.base, &string_or_empty(&self.action_type));
        base::apply_execution(&mut action, &self.execution);
        Ok(action)
    }

    fn to_state(action: &DeploymentAction, prior: Option<&Self>) -> Result<Self> {
        Ok(Self {
            base: base::to_state(action, prior.map(|p| &p.base)),
            execution: base::execution_to_state(action),
            action_type: string(action.action_type.as_str()),
        })
    }

    fn plan_kind(&mut self, config: &Self, _prior: Option<&Self>) {
        base::plan_execution(&mut self.execution, &config.execution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappers::actions::keys;

    #[test]
    fn generic_action_keeps_its_type_and_polyfills() {
        let state = GenericActionState {
            base: ActionBase {
                name: string("Deploy containers"),
                ..Default::default()
            },
            action_type: string("Octopus.KubernetesDeployContainers"),
            ..Default::default()
        };
        let action = state.to_deployment_action().expect("map");
        assert_eq!(action.action_type, "Octopus.KubernetesDeployContainers");
        assert_eq!(action.property(keys::KUBERNETES_STATUS_CHECK), Some("True"));

        let read = GenericActionState::to_state(&action, None).expect("read");
        assert_eq!(read.action_type, string("Octopus.KubernetesDeployContainers"));
    }
}
