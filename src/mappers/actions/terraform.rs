use tf_provider::value::Value;

use super::base::{self, bool_property_or_null, property_or_null, set_known, set_known_bool};
use super::{MappableAction, keys};
use crate::error::Result;
use crate::model::DeploymentAction;
use crate::mappers::keep_optional_block;
use crate::plan::default_to;
use crate::resources::deployment_process::state::{
    ActionBase, TerraformAdvancedOptionsState, TerraformAwsAccountState, TerraformAwsRoleState,
    TerraformAzureAccountState, TerraformGoogleCloudAccountState, TerraformTemplateActionState,
    TerraformTemplateState,
};
use crate::value::{format_bool, known, non_empty, parse_bool};

const SCRIPT_SOURCE_PACKAGE: &str = "Package";
const SCRIPT_SOURCE_INLINE: &str = "Inline";
const MANAGED_ACCOUNT_AWS: &str = "AWS";

const ADVANCED_OPTION_KEYS: [&str; 5] = [
    keys::TERRAFORM_ALLOW_PLUGIN_DOWNLOADS,
    keys::TERRAFORM_ACTION_PARAMS,
    keys::TERRAFORM_INIT_PARAMS,
    keys::TERRAFORM_PLUGINS_DIRECTORY,
    keys::TERRAFORM_WORKSPACE,
];

fn property_is(action: &DeploymentAction, key: &str, expected: &str) -> bool {
    action.property(key) == Some(expected)
}

fn apply_template(action: &mut DeploymentAction, template: &TerraformTemplateState) {
    set_known(action, keys::TERRAFORM_VAR_FILES, &template.additional_variable_files);
    set_known(action, keys::TERRAFORM_TEMPLATE_DIRECTORY, &template.directory);
    set_known_bool(
        action,
        keys::TERRAFORM_RUN_FILE_SUBSTITUTION,
        &template.run_automatic_file_substitution,
    );
    set_known(action, keys::TERRAFORM_FILE_SUBSTITUTION, &template.target_files);
}

fn apply_advanced_options(action: &mut DeploymentAction, options: &TerraformAdvancedOptionsState) {
    set_known_bool(
        action,
        keys::TERRAFORM_ALLOW_PLUGIN_DOWNLOADS,
        &options.allow_additional_plugin_downloads,
    );
    set_known(action, keys::TERRAFORM_ACTION_PARAMS, &options.apply_parameters);
    set_known(action, keys::TERRAFORM_INIT_PARAMS, &options.init_parameters);
    set_known(action, keys::TERRAFORM_PLUGINS_DIRECTORY, &options.plugin_cache_directory);
    set_known(action, keys::TERRAFORM_WORKSPACE, &options.workspace);
}

fn apply_aws_account(action: &mut DeploymentAction, account: &TerraformAwsAccountState) {
    action.set_property(keys::TERRAFORM_MANAGED_ACCOUNT, MANAGED_ACCOUNT_AWS);
    set_known(action, keys::AWS_REGION, &account.region);
    set_known(action, keys::AWS_ACCOUNT_VARIABLE, &account.variable);
    set_known_bool(action, keys::AWS_USE_INSTANCE_ROLE, &account.use_instance_role);

    if let Some(role) = known(&account.role) {
        action.set_property(keys::AWS_ASSUME_ROLE, format_bool(true));
        set_known(action, keys::AWS_ROLE_ARN, &role.arn);
        set_known(action, keys::AWS_ROLE_EXTERNAL_ID, &role.external_id);
        set_known(action, keys::AWS_ROLE_SESSION_NAME, &role.role_session_name);
        if let Some(duration) = known(&role.session_duration) {
            action.set_property(keys::AWS_ROLE_SESSION_DURATION, duration.to_string());
        }
    } else {
        action.set_property(keys::AWS_ASSUME_ROLE, format_bool(false));
    }
}

fn apply_google_account(action: &mut DeploymentAction, account: &TerraformGoogleCloudAccountState) {
    action.set_property(keys::TERRAFORM_GOOGLE_CLOUD_ACCOUNT, format_bool(true));
    set_known(action, keys::GOOGLE_ACCOUNT_VARIABLE, &account.variable);
    set_known_bool(action, keys::GOOGLE_USE_VM_SERVICE_ACCOUNT, &account.use_vm_service_account);
    set_known_bool(
        action,
        keys::GOOGLE_IMPERSONATE_SERVICE_ACCOUNT,
        &account.impersonate_service_account,
    );
    set_known(action, keys::GOOGLE_SERVICE_ACCOUNT_EMAILS, &account.service_account_emails);
    set_known(action, keys::GOOGLE_PROJECT, &account.project);
    set_known(action, keys::GOOGLE_REGION, &account.region);
    set_known(action, keys::GOOGLE_ZONE, &account.zone);
}

fn aws_account_state(
    action: &DeploymentAction,
    prior: Option<&TerraformAwsAccountState>,
) -> TerraformAwsAccountState {
    let role = if keep_optional_block(
        property_is(action, keys::AWS_ASSUME_ROLE, "True"),
        prior.map(|p| &p.role),
    ) {
        Value::Value(TerraformAwsRoleState {
            arn: property_or_null(action, keys::AWS_ROLE_ARN),
            external_id: property_or_null(action, keys::AWS_ROLE_EXTERNAL_ID),
            role_session_name: property_or_null(action, keys::AWS_ROLE_SESSION_NAME),
            session_duration: action
                .property(keys::AWS_ROLE_SESSION_DURATION)
                .and_then(|duration| duration.trim().parse().ok())
                .map_or(Value::Null, Value::Value),
        })
    } else {
        Value::Null
    };

    TerraformAwsAccountState {
        region: property_or_null(action, keys::AWS_REGION),
        variable: property_or_null(action, keys::AWS_ACCOUNT_VARIABLE),
        use_instance_role: bool_property_or_null(action, keys::AWS_USE_INSTANCE_ROLE),
        role,
    }
}

impl MappableAction for TerraformTemplateActionState {
    const BLOCK: &'static str = "apply_terraform_template_action";
    const ACTION_TYPE: &'static str = "Octopus.TerraformApply";

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn to_deployment_action(&self) -> Result<DeploymentAction> {
        let mut action = base::to_deployment_action(&self.base, Self::ACTION_TYPE);
        base::apply_execution(&mut action, &self.execution);

        let script_source = if non_empty(&self.inline_template).is_some() {
            SCRIPT_SOURCE_INLINE
        } else {
            SCRIPT_SOURCE_PACKAGE
        };
        action.set_property(keys::SCRIPT_SOURCE, script_source);
        set_known(&mut action, keys::TERRAFORM_TEMPLATE, &self.inline_template);
        set_known(&mut action, keys::TERRAFORM_TEMPLATE_PARAMETERS, &self.template_parameters);

        if let Some(template) = known(&self.template) {
            apply_template(&mut action, template);
        }
        if let Some(options) = known(&self.advanced_options) {
            apply_advanced_options(&mut action, options);
        }
        if let Some(account) = known(&self.aws_account) {
            apply_aws_account(&mut action, account);
        }
        if let Some(account) = known(&self.azure_account) {
            action.set_property(keys::TERRAFORM_AZURE_ACCOUNT, format_bool(true));
            set_known(&mut action, keys::AZURE_ACCOUNT_VARIABLE, &account.variable);
        }
        if let Some(account) = known(&self.google_cloud_account) {
            apply_google_account(&mut action, account);
        }
        Ok(action)
    }

    fn to_state(action: &DeploymentAction, prior: Option<&Self>) -> Result<Self> {
        let template = if keep_optional_block(
            property_is(action, keys::SCRIPT_SOURCE, SCRIPT_SOURCE_PACKAGE),
            prior.map(|p| &p.template),
        ) {
            Value::Value(TerraformTemplateState {
                additional_variable_files: property_or_null(action, keys::TERRAFORM_VAR_FILES),
                directory: property_or_null(action, keys::TERRAFORM_TEMPLATE_DIRECTORY),
                run_automatic_file_substitution: bool_property_or_null(
                    action,
                    keys::TERRAFORM_RUN_FILE_SUBSTITUTION,
                ),
                target_files: property_or_null(action, keys::TERRAFORM_FILE_SUBSTITUTION),
            })
        } else {
            Value::Null
        };

        let advanced_marker = ADVANCED_OPTION_KEYS
            .iter()
            .any(|key| action.property(key).is_some());
        let advanced_options = if keep_optional_block(advanced_marker, prior.map(|p| &p.advanced_options)) {
            Value::Value(TerraformAdvancedOptionsState {
                allow_additional_plugin_downloads: Value::Value(
                    action
                        .property(keys::TERRAFORM_ALLOW_PLUGIN_DOWNLOADS)
                        .is_none_or(parse_bool),
                ),
                apply_parameters: property_or_null(action, keys::TERRAFORM_ACTION_PARAMS),
                init_parameters: property_or_null(action, keys::TERRAFORM_INIT_PARAMS),
                plugin_cache_directory: property_or_null(action, keys::TERRAFORM_PLUGINS_DIRECTORY),
                workspace: property_or_null(action, keys::TERRAFORM_WORKSPACE),
            })
        } else {
            Value::Null
        };

        let aws_account = if keep_optional_block(
            property_is(action, keys::TERRAFORM_MANAGED_ACCOUNT, MANAGED_ACCOUNT_AWS),
            prior.map(|p| &p.aws_account),
        ) {
            let prior_account = prior.and_then(|p| known(&p.aws_account));
            Value::Value(aws_account_state(action, prior_account))
        } else {
            Value::Null
        };

        let azure_account = if keep_optional_block(
            property_is(action, keys::TERRAFORM_AZURE_ACCOUNT, "True"),
            prior.map(|p| &p.azure_account),
        ) {
            Value::Value(TerraformAzureAccountState {
                variable: property_or_null(action, keys::AZURE_ACCOUNT_VARIABLE),
            })
        } else {
            Value::Null
        };

        let google_cloud_account = if keep_optional_block(
            property_is(action, keys::TERRAFORM_GOOGLE_CLOUD_ACCOUNT, "True"),
            prior.map(|p| &p.google_cloud_account),
        ) {
            Value::Value(TerraformGoogleCloudAccountState {
                variable: property_or_null(action, keys::GOOGLE_ACCOUNT_VARIABLE),
                use_vm_service_account: bool_property_or_null(
                    action,
                    keys::GOOGLE_USE_VM_SERVICE_ACCOUNT,
                ),
                project: property_or_null(action, keys::GOOGLE_PROJECT),
                region: property_or_null(action, keys::GOOGLE_REGION),
                zone: property_or_null(action, keys::GOOGLE_ZONE),
                service_account_emails: property_or_null(action, keys::GOOGLE_SERVICE_ACCOUNT_EMAILS),
                impersonate_service_account: bool_property_or_null(
                    action,
                    keys::GOOGLE_IMPERSONATE_SERVICE_ACCOUNT,
                ),
            })
        } else {
            Value::Null
        };

        Ok(Self {
            base: base::to_state(action, prior.map(|p| &p.base)),
            execution: base::execution_to_state(action),
            advanced_options,
            aws_account,
            azure_account,
            google_cloud_account,
            template,
            template_parameters: property_or_null(action, keys::TERRAFORM_TEMPLATE_PARAMETERS),
            inline_template: property_or_null(action, keys::TERRAFORM_TEMPLATE),
        })
    }

    fn plan_kind(&mut self, config: &Self, _prior: Option<&Self>) {
        base::plan_execution(&mut self.execution, &config.execution);
        if let (Value::Value(options), Value::Value(config_options)) =
            (&mut self.advanced_options, &config.advanced_options)
        {
            default_to(
                &mut options.allow_additional_plugin_downloads,
                &config_options.allow_additional_plugin_downloads,
                true,
            );
        }
    }
}
