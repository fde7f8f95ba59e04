use super::base::{self, ensure_feature_is_enabled, property_or_empty, set_non_empty};
use super::{MappableAction, keys};
use crate::error::Result;
use crate::model::DeploymentAction;
use crate::plan::{carry, default_to};
use crate::resources::deployment_process::state::{
    ActionBase, RunKubectlScriptActionState, RunScriptActionState, ScriptState,
};
use crate::value::{format_bool, non_empty};

fn apply_script(action: &mut DeploymentAction, script: &ScriptState) {
    set_non_empty(action, keys::SCRIPT_FILE_NAME, &script.script_file_name);
    set_non_empty(action, keys::SCRIPT_BODY, &script.script_body);
    set_non_empty(action, keys::SCRIPT_PARAMETERS, &script.script_parameters);
    set_non_empty(action, keys::SCRIPT_SOURCE, &script.script_source);
    set_non_empty(action, keys::SCRIPT_SYNTAX, &script.script_syntax);

    if let Some(targets) = non_empty(&script.variable_substitution_in_files) {
        action.set_property(keys::SUBSTITUTE_IN_FILES_TARGETS, targets);
        action.set_property(keys::SUBSTITUTE_IN_FILES_ENABLED, format_bool(true));
        ensure_feature_is_enabled(action, keys::FEATURE_SUBSTITUTE_IN_FILES);
    }
}

fn script_state(action: &DeploymentAction) -> ScriptState {
    ScriptState {
        script_body: property_or_empty(action, keys::SCRIPT_BODY),
        script_syntax: property_or_empty(action, keys::SCRIPT_SYNTAX),
        script_file_name: property_or_empty(action, keys::SCRIPT_FILE_NAME),
        script_parameters: property_or_empty(action, keys::SCRIPT_PARAMETERS),
        script_source: property_or_empty(action, keys::SCRIPT_SOURCE),
        variable_substitution_in_files: property_or_empty(action, keys::SUBSTITUTE_IN_FILES_TARGETS),
    }
}

fn plan_script(planned: &mut ScriptState, config: &ScriptState, prior: Option<&ScriptState>) {
    default_to(&mut planned.script_body, &config.script_body, String::new());
    default_to(&mut planned.script_syntax, &config.script_syntax, String::new());
    default_to(&mut planned.script_file_name, &config.script_file_name, String::new());
    default_to(&mut planned.script_parameters, &config.script_parameters, String::new());
    default_to(
        &mut planned.variable_substitution_in_files,
        &config.variable_substitution_in_files,
        String::new(),
    );
    carry(
        &mut planned.script_source,
        &config.script_source,
        prior.map(|p| &p.script_source),
    );
}

impl MappableAction for RunScriptActionState {
    const BLOCK: &'static str = "run_script_action";
    const ACTION_TYPE: &'static str = "Octopus.Script";

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn to_deployment_action(&self) -> Result<DeploymentAction> {
        let mut action = base::to_deployment_action(&self.base, Self::ACTION_TYPE);
        base::apply_execution(&mut action, &self.execution);
        apply_script(&mut action, &self.script);
        Ok(action)
    }

    fn to_state(action: &DeploymentAction, prior: Option<&Self>) -> Result<Self> {
        Ok(Self {
            base: base::to_state(action, prior.map(|p| &p.base)),
            execution: base::execution_to_state(action),
            script: script_state(action),
        })
    }

    fn plan_kind(&mut self, config: &Self, prior: Option<&Self>) {
        base::plan_execution(&mut self.execution, &config.execution);
        plan_script(&mut self.script, &config.script, prior.map(|p| &p.script));
    }
}

impl MappableAction for RunKubectlScriptActionState {
    const BLOCK: &'static str = "run_kubectl_script_action";
    const ACTION_TYPE: &'static str = "Octopus.KubernetesRunScript";

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn to_deployment_action(&self) -> Result<DeploymentAction> {
        let mut action = base::to_deployment_action(&self.base, Self::ACTION_TYPE);
        base::apply_execution(&mut action, &self.execution);
        apply_script(&mut action, &self.script);
        set_non_empty(&mut action, keys::KUBERNETES_NAMESPACE, &self.namespace);
        Ok(action)
    }

    fn to_state(action: &DeploymentAction, prior: Option<&Self>) -> Result<Self> {
        Ok(Self {
            base: base::to_state(action, prior.map(|p| &p.base)),
            execution: base::execution_to_state(action),
            script: script_state(action),
            namespace: property_or_empty(action, keys::KUBERNETES_NAMESPACE),
        })
    }

    fn plan_kind(&mut self, config: &Self, prior: Option<&Self>) {
        base::plan_execution(&mut self.execution, &config.execution);
        plan_script(&mut self.script, &config.script, prior.map(|p| &p.script));
        default_to(&mut self.namespace, &config.namespace, String::new());
    }
}

#[cfg(test)]
mod tests {
    use tf_provider::value::Value;

    use super::*;
    use crate::value::string;

    fn run_script(body: &str) -> RunScriptActionState {
        RunScriptActionState {
            base: ActionBase {
                name: string("Hello"),
                ..Default::default()
            },
            script: ScriptState {
                script_body: string(body),
                script_syntax: string("Bash"),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn run_script_writes_script_properties() {
        let action = run_script("echo hi").to_deployment_action().expect("map");
        assert_eq!(action.action_type, "Octopus.Script");
        assert_eq!(action.property(keys::SCRIPT_BODY), Some("echo hi"));
        assert_eq!(action.property(keys::SCRIPT_SYNTAX), Some("Bash"));
        assert_eq!(action.property(keys::RUN_ON_SERVER), Some("False"));
        assert!(action.property(keys::SCRIPT_FILE_NAME).is_none());
        assert!(action.property(keys::ENABLED_FEATURES).is_none());
    }

    #[test]
    fn variable_substitution_enables_the_feature() {
        let mut state = run_script("echo hi");
        state.script.variable_substitution_in_files = string("appsettings.json");
        let action = state.to_deployment_action().expect("map");
        assert_eq!(
            action.property(keys::SUBSTITUTE_IN_FILES_TARGETS),
            Some("appsettings.json")
        );
        assert_eq!(action.property(keys::SUBSTITUTE_IN_FILES_ENABLED), Some("True"));
        assert_eq!(
            action.property(keys::ENABLED_FEATURES),
            Some(keys::FEATURE_SUBSTITUTE_IN_FILES)
        );

        let read = RunScriptActionState::to_state(&action, None).expect("read");
        assert_eq!(read.script.variable_substitution_in_files, string("appsettings.json"));
        assert_eq!(read.script.script_file_name, string(""));
    }

    #[test]
    fn kubectl_adds_namespace() {
        let state = RunKubectlScriptActionState {
            base: ActionBase {
                name: string("kubectl"),
                ..Default::default()
            },
            namespace: string("apps"),
            ..Default::default()
        };
        let action = state.to_deployment_action().expect("map");
        assert_eq!(action.action_type, "Octopus.KubernetesRunScript");
        assert_eq!(action.property(keys::KUBERNETES_NAMESPACE), Some("apps"));

        let read = RunKubectlScriptActionState::to_state(&action, None).expect("read");
        assert_eq!(read.namespace, string("apps"));
        assert_eq!(read.execution.run_on_server, Value::Value(false));
    }

    #[test]
    fn changed_script_recomputes_derived_attributes() {
        let config = run_script("echo new");
        let mut prior = run_script("echo old");
        prior.base.id = string("Actions-1");
        prior.base.properties = Value::Value(Default::default());
        prior.base.features = Value::Null;

        let mut planned = config.clone();
        planned.plan(&config, Some(&prior));
        assert_eq!(planned.base.id, string("Actions-1"));
        assert!(matches!(planned.base.properties, Value::Unknown));
        assert!(matches!(planned.base.features, Value::Unknown));
    }
}
