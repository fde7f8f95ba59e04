pub const ENABLED_FEATURES: &str = "Octopus.Action.EnabledFeatures";
pub const RUN_ON_SERVER: &str = "Octopus.Action.RunOnServer";
pub const TEMPLATE_ID: &str = "Octopus.Action.Template.Id";
pub const TEMPLATE_VERSION: &str = "Octopus.Action.Template.Version";

pub const PACKAGE_DOWNLOAD_ON_TENTACLE: &str = "Octopus.Action.Package.DownloadOnTentacle";
pub const PACKAGE_ID: &str = "Octopus.Action.Package.PackageId";
pub const PACKAGE_FEED_ID: &str = "Octopus.Action.Package.FeedId";
/// Package reference property, not an action property.
pub const PACKAGE_EXTRACT: &str = "Extract";

pub const SCRIPT_FILE_NAME: &str = "Octopus.Action.Script.ScriptFileName";
pub const SCRIPT_BODY: &str = "Octopus.Action.Script.ScriptBody";
pub const SCRIPT_PARAMETERS: &str = "Octopus.Action.Script.ScriptParameters";
pub const SCRIPT_SOURCE: &str = "Octopus.Action.Script.ScriptSource";
pub const SCRIPT_SYNTAX: &str = "Octopus.Action.Script.Syntax";
pub const SUBSTITUTE_IN_FILES_TARGETS: &str = "Octopus.Action.SubstituteInFiles.TargetFiles";
pub const SUBSTITUTE_IN_FILES_ENABLED: &str = "Octopus.Action.SubstituteInFiles.Enabled";
pub const FEATURE_SUBSTITUTE_IN_FILES: &str = "Octopus.Features.SubstituteInFiles";

pub const KUBERNETES_NAMESPACE: &str = "Octopus.Action.KubernetesContainers.Namespace";
pub const KUBERNETES_SECRET_NAME: &str = "Octopus.Action.KubernetesContainers.SecretName";
pub const KUBERNETES_SECRET_VALUES: &str = "Octopus.Action.KubernetesContainers.SecretValues";
pub const KUBERNETES_STATUS_CHECK: &str = "Octopus.Action.Kubernetes.ResourceStatusCheck";

pub const MANUAL_INSTRUCTIONS: &str = "Octopus.Action.Manual.Instructions";
pub const MANUAL_RESPONSIBLE_TEAMS: &str = "Octopus.Action.Manual.ResponsibleTeamIds";

pub const FEATURE_WINDOWS_SERVICE: &str = "Octopus.Features.WindowsService";
pub const WINDOWS_SERVICE_CREATE_OR_UPDATE: &str = "Octopus.Action.WindowsService.CreateOrUpdateService";
pub const WINDOWS_SERVICE_NAME: &str = "Octopus.Action.WindowsService.ServiceName";
pub const WINDOWS_SERVICE_DISPLAY_NAME: &str = "Octopus.Action.WindowsService.DisplayName";
pub const WINDOWS_SERVICE_DESCRIPTION: &str = "Octopus.Action.WindowsService.Description";
pub const WINDOWS_SERVICE_EXECUTABLE_PATH: &str = "Octopus.Action.WindowsService.ExecutablePath";
pub const WINDOWS_SERVICE_ARGUMENTS: &str = "Octopus.Action.WindowsService.Arguments";
pub const WINDOWS_SERVICE_ACCOUNT: &str = "Octopus.Action.WindowsService.ServiceAccount";
pub const WINDOWS_SERVICE_CUSTOM_ACCOUNT_NAME: &str = "Octopus.Action.WindowsService.CustomAccountName";
pub const WINDOWS_SERVICE_CUSTOM_ACCOUNT_PASSWORD: &str =
    "Octopus.Action.WindowsService.CustomAccountPassword";
pub const WINDOWS_SERVICE_START_MODE: &str = "Octopus.Action.WindowsService.StartMode";
pub const WINDOWS_SERVICE_DEPENDENCIES: &str = "Octopus.Action.WindowsService.Dependencies";

pub const TERRAFORM_TEMPLATE: &str = "Octopus.Action.Terraform.Template";
pub const TERRAFORM_TEMPLATE_PARAMETERS: &str = "Octopus.Action.Terraform.TemplateParameters";
pub const TERRAFORM_VAR_FILES: &str = "Octopus.Action.Terraform.VarFiles";
pub const TERRAFORM_TEMPLATE_DIRECTORY: &str = "Octopus.Action.Terraform.TemplateDirectory";
pub const TERRAFORM_RUN_FILE_SUBSTITUTION: &str = "Octopus.Action.Terraform.RunAutomaticFileSubstitution";
pub const TERRAFORM_FILE_SUBSTITUTION: &str = "Octopus.Action.Terraform.FileSubstitution";
pub const TERRAFORM_ALLOW_PLUGIN_DOWNLOADS: &str = "Octopus.Action.Terraform.AllowPluginDownloads";
pub const TERRAFORM_ACTION_PARAMS: &str = "Octopus.Action.Terraform.AdditionalActionParams";
pub const TERRAFORM_INIT_PARAMS: &str = "Octopus.Action.Terraform.AdditionalInitParams";
pub const TERRAFORM_PLUGINS_DIRECTORY: &str = "Octopus.Action.Terraform.PluginsDirectory";
pub const TERRAFORM_WORKSPACE: &str = "Octopus.Action.Terraform.Workspace";
pub const TERRAFORM_MANAGED_ACCOUNT: &str = "Octopus.Action.Terraform.ManagedAccount";
pub const TERRAFORM_AZURE_ACCOUNT: &str = "Octopus.Action.Terraform.AzureAccount";
pub const TERRAFORM_GOOGLE_CLOUD_ACCOUNT: &str = "Octopus.Action.Terraform.GoogleCloudAccount";

pub const AWS_REGION: &str = "Octopus.Action.Aws.Region";
pub const AWS_ASSUME_ROLE: &str = "Octopus.Action.Aws.AssumeRole";
pub const AWS_ROLE_ARN: &str = "Octopus.Action.Aws.AssumedRoleArn";
pub const AWS_ROLE_EXTERNAL_ID: &str = "Octopus.Action.Aws.AssumeRoleExternalId";
pub const AWS_ROLE_SESSION_NAME: &str = "Octopus.Action.Aws.AssumedRoleSession";
pub const AWS_ROLE_SESSION_DURATION: &str = "Octopus.Action.Aws.AssumeRoleSessionDurationSeconds";
pub const AWS_ACCOUNT_VARIABLE: &str = "Octopus.Action.AwsAccount.Variable";
pub const AWS_USE_INSTANCE_ROLE: &str = "Octopus.Action.AwsAccount.UseInstanceRole";

pub const AZURE_ACCOUNT_VARIABLE: &str = "Octopus.Action.AzureAccount.Variable";

pub const GOOGLE_ACCOUNT_VARIABLE: &str = "Octopus.Action.GoogleCloudAccount.Variable";
pub const GOOGLE_USE_VM_SERVICE_ACCOUNT: &str = "Octopus.Action.GoogleCloud.UseVMServiceAccount";
pub const GOOGLE_IMPERSONATE_SERVICE_ACCOUNT: &str = "Octopus.Action.GoogleCloud.ImpersonateServiceAccount";
pub const GOOGLE_SERVICE_ACCOUNT_EMAILS: &str = "Octopus.Action.GoogleCloud.ServiceAccountEmails";
pub const GOOGLE_ZONE: &str = "Octopus.Action.GoogleCloud.Zone";
pub const GOOGLE_REGION: &str = "Octopus.Action.GoogleCloud.Region";
pub const GOOGLE_PROJECT: &str = "Octopus.Action.GoogleCloud.Project";

pub const STEP_CONDITION_EXPRESSION: &str = "Octopus.Step.ConditionVariableExpression";
pub const STEP_TARGET_ROLES: &str = "Octopus.Action.TargetRoles";
pub const STEP_MAX_PARALLELISM: &str = "Octopus.Action.MaxParallelism";
