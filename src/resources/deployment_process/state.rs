use serde::{Deserialize, Serialize};
use tf_provider::value;
use tf_provider::value::Value;

use crate::value::{Blocks, BoolValue, NumberValue, StringList, StringMap, StringValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessState {
    pub id: StringValue,
    pub space_id: StringValue,
    pub project_id: StringValue,
    pub branch: StringValue,
    pub last_snapshot_id: StringValue,
    pub version: StringValue,
    pub step: Blocks<StepState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepState {
    pub id: StringValue,
    pub name: StringValue,
    pub condition: StringValue,
    pub condition_expression: StringValue,
    pub package_requirement: StringValue,
    pub properties: StringMap,
    pub start_trigger: StringValue,
    pub target_roles: StringList,
    pub window_size: StringValue,

    pub action: Blocks<GenericActionState>,
    pub apply_terraform_template_action: Blocks<TerraformTemplateActionState>,
    pub deploy_kubernetes_secret_action: Blocks<KubernetesSecretActionState>,
    pub deploy_package_action: Blocks<PackageActionState>,
    pub deploy_windows_service_action: Blocks<WindowsServiceActionState>,
    pub manual_intervention_action: Blocks<ManualInterventionActionState>,
    pub run_kubectl_script_action: Blocks<RunKubectlScriptActionState>,
    pub run_script_action: Blocks<RunScriptActionState>,
}

/// Attributes and blocks every action kind carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionBase {
    pub can_be_used_for_project_versioning: BoolValue,
    pub channels: StringList,
    pub condition: StringValue,
    pub environments: StringList,
    pub excluded_environments: StringList,
    pub features: StringList,
    pub id: StringValue,
    pub is_disabled: BoolValue,
    pub is_required: BoolValue,
    pub name: StringValue,
    pub notes: StringValue,
    pub properties: StringMap,
    pub sort_order: NumberValue,
    pub computed_sort_order: NumberValue,
    pub slug: StringValue,
    pub tenant_tags: StringList,

    #[serde(with = "value::serde_as_vec")]
    pub container: Value<ContainerState>,
    #[serde(with = "value::serde_as_vec")]
    pub action_template: Value<ActionTemplateState>,
    #[serde(with = "value::serde_as_vec")]
    pub git_dependency: Value<GitDependencyState>,
    #[serde(with = "value::serde_as_vec")]
    pub primary_package: Value<PackageState>,
    pub package: Blocks<NamedPackageState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerState {
    pub feed_id: StringValue,
    pub image: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionTemplateState {
    pub id: StringValue,
    pub version: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitDependencyState {
    pub repository_uri: StringValue,
    pub default_branch: StringValue,
    pub git_credential_type: StringValue,
    pub file_path_filters: StringList,
    pub git_credential_id: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageState {
    pub acquisition_location: StringValue,
    pub feed_id: StringValue,
    pub id: StringValue,
    pub package_id: StringValue,
    pub properties: StringMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedPackageState {
    pub name: StringValue,
    pub extract_during_deployment: BoolValue,
    #[serde(flatten)]
    pub package: PackageState,
}

/// Where an action runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub run_on_server: BoolValue,
    pub worker_pool_id: StringValue,
    pub worker_pool_variable: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptState {
    pub script_body: StringValue,
    pub script_syntax: StringValue,
    pub script_file_name: StringValue,
    pub script_parameters: StringValue,
    pub script_source: StringValue,
    pub variable_substitution_in_files: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericActionState {
    #[serde(flatten)]
    pub base: ActionBase,
    #[serde(flatten)]
    pub execution: Execution,
    pub action_type: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunScriptActionState {
    #[serde(flatten)]
    pub base: ActionBase,
    #[serde(flatten)]
    pub execution: Execution,
    #[serde(flatten)]
    pub script: ScriptState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunKubectlScriptActionState {
    #[serde(flatten)]
    pub base: ActionBase,
    #[serde(flatten)]
    pub execution: Execution,
    #[serde(flatten)]
    pub script: ScriptState,
    pub namespace: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualInterventionActionState {
    #[serde(flatten)]
    pub base: ActionBase,
    pub instructions: StringValue,
    pub responsible_teams: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KubernetesSecretActionState {
    #[serde(flatten)]
    pub base: ActionBase,
    #[serde(flatten)]
    pub execution: Execution,
    pub secret_name: StringValue,
    pub secret_values: StringMap,
    pub kubernetes_object_status_check_enabled: BoolValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowsServiceState {
    pub arguments: StringValue,
    pub create_or_update_service: BoolValue,
    pub custom_account_name: StringValue,
    pub custom_account_password: StringValue,
    pub dependencies: StringValue,
    pub description: StringValue,
    pub display_name: StringValue,
    pub executable_path: StringValue,
    pub service_account: StringValue,
    pub service_name: StringValue,
    pub start_mode: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowsServiceActionState {
    #[serde(flatten)]
    pub base: ActionBase,
    #[serde(flatten)]
    pub service: WindowsServiceState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageActionState {
    #[serde(flatten)]
    pub base: ActionBase,
    #[serde(with = "value::serde_as_vec")]
    pub windows_service: Value<WindowsServiceState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformTemplateActionState {
    #[serde(flatten)]
    pub base: ActionBase,
    #[serde(flatten)]
    pub execution: Execution,
    #[serde(with = "value::serde_as_vec")]
    pub advanced_options: Value<TerraformAdvancedOptionsState>,
    #[serde(with = "value::serde_as_vec")]
    pub aws_account: Value<TerraformAwsAccountState>,
    #[serde(with = "value::serde_as_vec")]
    pub azure_account: Value<TerraformAzureAccountState>,
    #[serde(with = "value::serde_as_vec")]
    pub google_cloud_account: Value<TerraformGoogleCloudAccountState>,
    #[serde(with = "value::serde_as_vec")]
    pub template: Value<TerraformTemplateState>,
    pub template_parameters: StringValue,
    pub inline_template: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformAdvancedOptionsState {
    pub allow_additional_plugin_downloads: BoolValue,
    pub apply_parameters: StringValue,
    pub init_parameters: StringValue,
    pub plugin_cache_directory: StringValue,
    pub workspace: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformAwsAccountState {
    pub region: StringValue,
    pub variable: StringValue,
    pub use_instance_role: BoolValue,
    #[serde(with = "value::serde_as_vec")]
    pub role: Value<TerraformAwsRoleState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformAwsRoleState {
    pub arn: StringValue,
    pub external_id: StringValue,
    pub role_session_name: StringValue,
    pub session_duration: NumberValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformAzureAccountState {
    pub variable: StringValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformGoogleCloudAccountState {
    pub variable: StringValue,
    pub use_vm_service_account: BoolValue,
    pub project: StringValue,
    pub region: StringValue,
    pub zone: StringValue,
    pub service_account_emails: StringValue,
    pub impersonate_service_account: BoolValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformTemplateState {
    pub additional_variable_files: StringValue,
    pub directory: StringValue,
    pub run_automatic_file_substitution: BoolValue,
    pub target_files: StringValue,
}
