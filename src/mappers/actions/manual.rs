use super::base::{self, property_or_empty, property_or_null, set_known, set_non_empty};
use super::{MappableAction, keys};
use crate::error::Result;
use crate::model::DeploymentAction;
use crate::resources::deployment_process::state::{ActionBase, ManualInterventionActionState};

impl MappableAction for ManualInterventionActionState {
    const BLOCK: &'static str = "manual_intervention_action";
    const ACTION_TYPE: &'static str = "Octopus.Manual";

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn to_deployment_action(&self) -> Result<DeploymentAction> {
        let mut action = base::to_deployment_action(&self.base, Self::ACTION_TYPE);
        set_non_empty(&mut action, keys::MANUAL_INSTRUCTIONS, &self.instructions);
        set_known(&mut action, keys::MANUAL_RESPONSIBLE_TEAMS, &self.responsible_teams);
        Ok(action)
    }

    fn to_state(action: &DeploymentAction, prior: Option<&Self>) -> Result<Self> {
        Ok(Self {
            base: base::to_state(action, prior.map(|p| &p.base)),
            instructions: property_or_empty(action, keys::MANUAL_INSTRUCTIONS),
            responsible_teams: property_or_null(action, keys::MANUAL_RESPONSIBLE_TEAMS),
        })
    }

    fn plan_kind(&mut self, _config: &Self, _prior: Option<&Self>) {}
}

#[cfg(test)]
mod tests {
    use tf_provider::value::Value;

    use super::*;
    use crate::value::string;

    #[test]
    fn manual_intervention_round_trips_instructions() {
        let state = ManualInterventionActionState {
            base: ActionBase {
                name: string("Approve"),
                ..Default::default()
            },
            instructions: string("Check the dashboards"),
            responsible_teams: Value::Null,
        };
        let action = state.to_deployment_action().expect("map");
        assert_eq!(action.action_type, "Octopus.Manual");
        assert!(action.property(keys::MANUAL_RESPONSIBLE_TEAMS).is_none());

        let read = ManualInterventionActionState::to_state(&action, None).expect("read");
        assert_eq!(read.instructions, string("Check the dashboards"));
        assert!(matches!(read.responsible_teams, Value::Null));
        assert!(read.base.properties != Value::Null);
    }
}
