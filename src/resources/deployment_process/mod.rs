use async_trait::async_trait;
use tf_provider::{AttributePath, Diagnostics, Resource};
use tf_provider::schema::{AttributeConstraint, Block, NestedBlock, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tracing::{Instrument, info};

use super::{operation_span, plan_space_id, space_of};
use crate::client::OctopusClient;
use crate::error::{Result, process_api_error, remove_from_state_if_not_found};
use crate::mappers::deployment_process::{
    plan_process, populated_action_blocks, to_deployment_process, to_state,
};
use crate::model::DeploymentProcess;
use crate::provider::ClientHandle;
use crate::schema::{self, ActionSchemaBuilder, Attributes, Blocks};
use crate::validators;
use crate::value::{blocks, known, non_empty, string_or_empty};

pub mod state;

use state::ProcessState;

pub const TYPE_NAME: &str = "octopusdeploy_deployment_process";

fn step_block() -> Block {
    use AttributeConstraint::{Computed, OptionalComputed, Required};

    let mut attributes = Attributes::new();
    attributes.insert("id".into(), schema::string(Computed, "The unique ID for this step."));
    attributes.insert("name".into(), schema::string(Required, "The name of this step."));
    attributes.insert(
        "condition".into(),
        schema::string(
            OptionalComputed,
            "When to run the step: `Success`, `Failure`, `Always` or `Variable`. Defaults to `Success`.",
        ),
    );
    attributes.insert(
        "condition_expression".into(),
        schema::string(OptionalComputed, "The expression evaluated when `condition` is `Variable`."),
    );
    attributes.insert(
        "package_requirement".into(),
        schema::string(
            OptionalComputed,
            "Whether to run this step before or after package acquisition. Defaults to `LetOctopusDecide`.",
        ),
    );
    attributes.insert(
        "properties".into(),
        schema::string_map(OptionalComputed, "The properties associated with this step."),
    );
    attributes.insert(
        "start_trigger".into(),
        schema::string(
            OptionalComputed,
            "Whether to run this step after the previous one or in parallel with it. Defaults to `StartAfterPrevious`.",
        ),
    );
    attributes.insert(
        "target_roles".into(),
        schema::string_list(OptionalComputed, "The roles that this step run against."),
    );
    attributes.insert(
        "window_size".into(),
        schema::string(OptionalComputed, "The maximum number of targets to deploy to simultaneously."),
    );

    let execution = || {
        ActionSchemaBuilder::new()
            .with_execution_location()
            .with_worker_pool()
            .with_worker_pool_variable()
    };
    let mut blocks = Blocks::new();
    blocks.insert(
        "action".into(),
        execution()
            .with_action_type()
            .build("A generic deployment action of any type."),
    );
    blocks.insert(
        "manual_intervention_action".into(),
        ActionSchemaBuilder::new()
            .with_manual_intervention()
            .build("A manual intervention step waiting for a user to continue or abort."),
    );
    blocks.insert(
        "apply_terraform_template_action".into(),
        execution()
            .with_terraform_template()
            .build("Applies a Terraform template."),
    );
    blocks.insert(
        "deploy_package_action".into(),
        ActionSchemaBuilder::new()
            .with_windows_service_feature()
            .build("Deploys a package to the deployment targets."),
    );
    blocks.insert(
        "deploy_windows_service_action".into(),
        ActionSchemaBuilder::new()
            .with_windows_service()
            .build("Deploys a package and installs it as a Windows service."),
    );
    blocks.insert(
        "run_script_action".into(),
        execution()
            .with_script()
            .with_script_from_package()
            .with_variable_substitution_in_files()
            .build("Runs a script."),
    );
    blocks.insert(
        "run_kubectl_script_action".into(),
        execution()
            .with_script()
            .with_script_from_package()
            .with_variable_substitution_in_files()
            .with_namespace()
            .build("Runs a script with kubectl configured for the target cluster."),
    );
    blocks.insert(
        "deploy_kubernetes_secret_action".into(),
        execution()
            .with_kubernetes_secret()
            .build("Creates or updates a Kubernetes secret."),
    );

    schema::block("A step of the deployment process.", attributes, blocks)
}

pub fn process_block() -> Block {
    use AttributeConstraint::{Computed, Optional, OptionalComputed, Required};

    let mut attributes = Attributes::new();
    attributes.insert("id".into(), schema::id());
    attributes.insert("space_id".into(), schema::space_id("deployment process"));
    attributes.insert(
        "project_id".into(),
        schema::string(Required, "The project ID associated with this deployment process."),
    );
    attributes.insert(
        "branch".into(),
        schema::string(
            Optional,
            "The branch name associated with this deployment process, for version-controlled projects.",
        ),
    );
    attributes.insert(
        "last_snapshot_id".into(),
        schema::string(OptionalComputed, "The ID of the last release snapshot of this process."),
    );
    attributes.insert(
        "version".into(),
        schema::string(Computed, "The version number of this deployment process."),
    );

    let mut blocks = Blocks::new();
    blocks.insert("step".into(), NestedBlock::List(step_block()));

    schema::block(
        "This resource manages deployment processes in Octopus Deploy.",
        attributes,
        blocks,
    )
}

/// Checks a configured process for problems the server would reject.
pub fn validate_process(diags: &mut Diagnostics, config: &ProcessState) {
    validators::not_empty(diags, AttributePath::new("project_id"), &config.project_id);

    let steps: Vec<_> = known(&config.step).into_iter().flatten().collect();
    validators::unique_names(
        diags,
        "step",
        steps.iter().enumerate().filter_map(|(index, step)| {
            let step = known(step)?;
            Some((non_empty(&step.name)?, AttributePath::new("step").index(index as i64)))
        }),
    );

    for (index, step) in steps.iter().enumerate() {
        let Value::Value(step) = step else {
            continue;
        };
        let path = AttributePath::new("step").index(index as i64);
        validators::not_empty(diags, path.clone().attribute("name"), &step.name);

        if populated_action_blocks(step).is_empty() && !has_unknown_action_block(step) {
            diags.error(
                "step has no action",
                format!(
                    "Step \"{}\" must declare at least one action block.",
                    string_or_empty(&step.name)
                ),
                path.clone(),
            );
        }

        let mut action_names = Vec::new();
        collect_action_names(step, &mut action_names);
        validators::unique_names(
            diags,
            "action",
            action_names
                .into_iter()
                .map(|(block, name)| (name, path.clone().attribute(block))),
        );
    }
}

/// A block list that is still unknown may hold actions once known.
fn has_unknown_action_block(step: &state::StepState) -> bool {
    [
        matches!(step.action, Value::Unknown),
        matches!(step.manual_intervention_action, Value::Unknown),
        matches!(step.apply_terraform_template_action, Value::Unknown),
        matches!(step.deploy_package_action, Value::Unknown),
        matches!(step.deploy_windows_service_action, Value::Unknown),
        matches!(step.run_script_action, Value::Unknown),
        matches!(step.run_kubectl_script_action, Value::Unknown),
        matches!(step.deploy_kubernetes_secret_action, Value::Unknown),
    ]
    .contains(&true)
}

fn collect_action_names<'a>(step: &'a state::StepState, names: &mut Vec<(&'static str, &'a str)>) {
    macro_rules! names_of {
        ($($field:ident),*) => {
            $(
                names.extend(
                    blocks(&step.$field)
                        .filter_map(|action| non_empty(&action.base.name))
                        .map(|name| (stringify!($field), name)),
                );
            )*
        };
    }
    names_of!(
        action,
        manual_intervention_action,
        apply_terraform_template_action,
        deploy_package_action,
        deploy_windows_service_action,
        run_script_action,
        run_kubectl_script_action,
        deploy_kubernetes_secret_action
    );
}

/// A project owns exactly one process. Create and update replace its steps and
/// destroy clears them; the process itself is never created or deleted.
#[derive(Debug, Clone)]
pub struct DeploymentProcessResource {
    client: ClientHandle,
}

impl DeploymentProcessResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }

    async fn client(&self, diags: &mut Diagnostics) -> Option<OctopusClient> {
        match self.client.get().await {
            Ok(client) => Some(client),
            Err(err) => process_api_error(diags, err, "reach Octopus for deployment process"),
        }
    }
}

async fn current_process(client: &OctopusClient, state: &ProcessState) -> Result<DeploymentProcess> {
    client
        .project_deployment_process(
            space_of(client, &state.space_id),
            &string_or_empty(&state.project_id),
            non_empty(&state.branch),
        )
        .await
}

/// PUTs `state`'s steps onto the project's process and maps the answer back.
async fn replace_steps(client: &OctopusClient, state: &ProcessState) -> Result<ProcessState> {
    let current = current_process(client, state).await?;
    let mut process = to_deployment_process(state, Some(&current))?;
    if process.space_id.is_none() {
        process.space_id = current.space_id.clone();
    }
    let updated = client.update_deployment_process(&process).await?;
    info!(
        id = updated.id.as_deref().unwrap_or_default(),
        version = updated.version,
        steps = updated.steps.len(),
        "deployment process updated"
    );
    to_state(&updated, Some(state))
}

#[async_trait]
impl Resource for DeploymentProcessResource {
    type State<'a> = ProcessState;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: process_block(),
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        validate_process(diags, &config);
        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let span = operation_span("read", TYPE_NAME, &string_or_empty(&state.id));
        async move {
            let client = self.client(diags).await?;
            let process = match current_process(&client, &state).await {
                Ok(process) => process,
                Err(err) => return remove_from_state_if_not_found(diags, err, "deployment process")?,
            };
            match to_state(&process, Some(&state)) {
                Ok(state) => Some((state, private_state)),
                Err(err) => process_api_error(diags, err, "map deployment process"),
            }
        }
        .instrument(span)
        .await
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut planned = proposed_state;
        plan_process(&mut planned, &config_state, None);
        let client = self.client.get().await.ok();
        plan_space_id(&mut planned.space_id, &config_state.space_id, None, client.as_ref());
        Some((planned, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        let mut planned = proposed_state;
        plan_process(&mut planned, &config_state, Some(&prior_state));
        let client = self.client.get().await.ok();
        plan_space_id(
            &mut planned.space_id,
            &config_state.space_id,
            Some(&prior_state.space_id),
            client.as_ref(),
        );

        let mut replace = Vec::new();
        if planned.project_id != prior_state.project_id {
            replace.push(AttributePath::new("project_id"));
        }
        if known(&planned.space_id).is_some() && planned.space_id != prior_state.space_id {
            replace.push(AttributePath::new("space_id"));
        }
        Some((planned, prior_private_state, replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let span = operation_span("create", TYPE_NAME, &string_or_empty(&planned_state.project_id));
        async move {
            let client = self.client(diags).await?;
            match replace_steps(&client, &planned_state).await {
                Ok(state) => Some((state, planned_private_state)),
                Err(err) => process_api_error(diags, err, "create deployment process"),
            }
        }
        .instrument(span)
        .await
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let span = operation_span("update", TYPE_NAME, &string_or_empty(&planned_state.id));
        async move {
            let client = self.client(diags).await?;
            match replace_steps(&client, &planned_state).await {
                Ok(state) => Some((state, planned_private_state)),
                Err(err) => process_api_error(diags, err, "update deployment process"),
            }
        }
        .instrument(span)
        .await
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let span = operation_span("delete", TYPE_NAME, &string_or_empty(&state.id));
        async move {
            let client = self.client(diags).await?;
            let mut process = match current_process(&client, &state).await {
                Ok(process) => process,
                Err(err) if err.is_not_found() => {
                    info!("deployment process already gone");
                    return Some(());
                }
                Err(err) => return process_api_error(diags, err, "read deployment process"),
            };
            process.steps.clear();
            match client.update_deployment_process(&process).await {
                Ok(_) => {
                    info!("deployment process cleared");
                    Some(())
                }
                Err(err) if err.is_not_found() => Some(()),
                Err(err) => process_api_error(diags, err, "delete deployment process"),
            }
        }
        .instrument(span)
        .await
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let span = operation_span("import", TYPE_NAME, &id);
        async move {
            let client = self.client(diags).await?;
            let process: DeploymentProcess = match client.get(client.space_id(), &id).await {
                Ok(process) => process,
                Err(err) => return process_api_error(diags, err, "import deployment process"),
            };
            match to_state(&process, None) {
                Ok(state) => Some((state, Default::default())),
                Err(err) => process_api_error(diags, err, "map deployment process"),
            }
        }
        .instrument(span)
        .await
    }
}
