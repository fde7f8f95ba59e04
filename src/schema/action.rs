use tf_provider::schema::{AttributeConstraint, Block, Description, NestedBlock};

use super::{Attributes, Blocks, block, boolean, number, sensitive, slug, string, string_list, string_map};

/// Composes the nested block for one deployment action kind.
///
/// Every kind shares the base attributes and package/container blocks; the
/// `with_*` methods add what a specific kind maps onto its property bag.
#[derive(Debug, Clone)]
pub struct ActionSchemaBuilder {
    attributes: Attributes,
    blocks: Blocks,
}

impl Default for ActionSchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionSchemaBuilder {
    pub fn new() -> Self {
        use AttributeConstraint::{Computed, Optional, OptionalComputed, Required};

        let mut attributes = Attributes::new();
        attributes.insert(
            "can_be_used_for_project_versioning".into(),
            boolean(OptionalComputed, "Whether this action can be used for project versioning."),
        );
        attributes.insert(
            "channels".into(),
            string_list(OptionalComputed, "The channels associated with this deployment action."),
        );
        attributes.insert(
            "condition".into(),
            string(OptionalComputed, "The condition associated with this deployment action."),
        );
        attributes.insert(
            "environments".into(),
            string_list(
                OptionalComputed,
                "The environments within which this deployment action will run.",
            ),
        );
        attributes.insert(
            "excluded_environments".into(),
            string_list(OptionalComputed, "The environments that this step will be skipped in."),
        );
        attributes.insert(
            "features".into(),
            string_list(OptionalComputed, "A list of enabled features for this action."),
        );
        attributes.insert("id".into(), super::id());
        attributes.insert(
            "is_disabled".into(),
            boolean(
                OptionalComputed,
                "Indicates the disabled status of this deployment action. Defaults to `false`.",
            ),
        );
        attributes.insert(
            "is_required".into(),
            boolean(
                OptionalComputed,
                "Indicates the required status of this deployment action. Defaults to `false`.",
            ),
        );
        attributes.insert(
            "name".into(),
            string(Required, "The name of this deployment action."),
        );
        attributes.insert(
            "notes".into(),
            string(OptionalComputed, "The notes associated with this deployment action."),
        );
        attributes.insert(
            "properties".into(),
            string_map(OptionalComputed, "The properties associated with this deployment action."),
        );
        attributes.insert(
            "sort_order".into(),
            number(
                OptionalComputed,
                "Order used to sort the actions of a step. Provide it on every action of the step or on none.",
            ),
        );
        attributes.insert(
            "computed_sort_order".into(),
            number(Computed, "The final position of this action within its step."),
        );
        attributes.insert("slug".into(), slug("action"));
        attributes.insert(
            "tenant_tags".into(),
            string_list(OptionalComputed, "A list of tenant tags associated with this resource."),
        );

        let mut blocks = Blocks::new();
        blocks.insert(
            "container".into(),
            NestedBlock::Optional(block(
                "The container image used to run this action.",
                Attributes::from([
                    ("feed_id".into(), string(Optional, "The feed the image comes from.")),
                    ("image".into(), string(Optional, "The container image.")),
                ]),
                Blocks::new(),
            )),
        );
        blocks.insert(
            "action_template".into(),
            NestedBlock::Optional(block(
                "The step template this action is based on.",
                Attributes::from([
                    ("id".into(), string(Required, "The ID of the step template.")),
                    ("version".into(), string(Optional, "The version of the step template.")),
                ]),
                Blocks::new(),
            )),
        );
        blocks.insert("git_dependency".into(), NestedBlock::Optional(git_dependency()));
        blocks.insert("primary_package".into(), NestedBlock::Optional(package(false)));
        blocks.insert("package".into(), NestedBlock::List(package(true)));

        Self { attributes, blocks }
    }

    pub fn with_action_type(mut self) -> Self {
        self.attributes.insert(
            "action_type".into(),
            string(AttributeConstraint::Required, "The type of action."),
        );
        self
    }

    pub fn with_execution_location(mut self) -> Self {
        self.attributes.insert(
            "run_on_server".into(),
            boolean(
                AttributeConstraint::OptionalComputed,
                "Whether this step runs on a worker or on the target. Defaults to `false`.",
            ),
        );
        self
    }

    pub fn with_worker_pool(mut self) -> Self {
        self.attributes.insert(
            "worker_pool_id".into(),
            string(
                AttributeConstraint::OptionalComputed,
                "The worker pool associated with this deployment action.",
            ),
        );
        self
    }

    pub fn with_worker_pool_variable(mut self) -> Self {
        self.attributes.insert(
            "worker_pool_variable".into(),
            string(
                AttributeConstraint::OptionalComputed,
                "The worker pool variable associated with this deployment action.",
            ),
        );
        self
    }

    pub fn with_script(mut self) -> Self {
        self.attributes.insert(
            "script_body".into(),
            string(AttributeConstraint::OptionalComputed, "The inline script body."),
        );
        self.attributes.insert(
            "script_syntax".into(),
            string(
                AttributeConstraint::OptionalComputed,
                "The script language: `PowerShell`, `CSharp`, `Bash`, `FSharp` or `Python`.",
            ),
        );
        self
    }

    pub fn with_script_from_package(mut self) -> Self {
        self.attributes.insert(
            "script_file_name".into(),
            string(AttributeConstraint::OptionalComputed, "The script file name in the package."),
        );
        self.attributes.insert(
            "script_parameters".into(),
            string(
                AttributeConstraint::OptionalComputed,
                "Parameters expected by the script, using the platform specific calling convention.",
            ),
        );
        self.attributes.insert(
            "script_source".into(),
            string(
                AttributeConstraint::OptionalComputed,
                "Where the script comes from: `Inline` or `Package`.",
            ),
        );
        self
    }

    pub fn with_variable_substitution_in_files(mut self) -> Self {
        self.attributes.insert(
            "variable_substitution_in_files".into(),
            string(
                AttributeConstraint::OptionalComputed,
                "A newline-separated list of file names to transform, relative to the package contents.",
            ),
        );
        self
    }

    pub fn with_namespace(mut self) -> Self {
        self.attributes.insert(
            "namespace".into(),
            string(AttributeConstraint::OptionalComputed, "The Kubernetes namespace."),
        );
        self
    }

    pub fn with_manual_intervention(mut self) -> Self {
        self.attributes.insert(
            "instructions".into(),
            string(AttributeConstraint::Required, "The instructions for the user to follow."),
        );
        self.attributes.insert(
            "responsible_teams".into(),
            string(
                AttributeConstraint::Optional,
                "The teams responsible to resolve this step. When empty, anyone allowed to deploy the project can resolve it.",
            ),
        );
        self
    }

    pub fn with_kubernetes_secret(mut self) -> Self {
        self.attributes.insert(
            "secret_name".into(),
            string(AttributeConstraint::Required, "The name of the secret resource."),
        );
        self.attributes.insert(
            "secret_values".into(),
            string_map(AttributeConstraint::Required, "The key/value pairs stored in the secret."),
        );
        self.attributes.insert(
            "kubernetes_object_status_check_enabled".into(),
            boolean(
                AttributeConstraint::OptionalComputed,
                "Whether the Kubernetes object status check runs. Defaults to `true`.",
            ),
        );
        self
    }

    pub fn with_windows_service(mut self) -> Self {
        self.attributes.extend(windows_service());
        self
    }

    pub fn with_windows_service_feature(mut self) -> Self {
        self.blocks.insert(
            "windows_service".into(),
            NestedBlock::Optional(block(
                "Deploy the package as a Windows service.",
                windows_service(),
                Blocks::new(),
            )),
        );
        self
    }

    pub fn with_terraform_template(mut self) -> Self {
        use AttributeConstraint::Optional;

        self.blocks.insert(
            "advanced_options".into(),
            NestedBlock::Optional(block(
                "Optional advanced options for Terraform.",
                Attributes::from([
                    (
                        "allow_additional_plugin_downloads".into(),
                        boolean(
                            AttributeConstraint::OptionalComputed,
                            "Allow Terraform to download plugins. Defaults to `true`.",
                        ),
                    ),
                    ("apply_parameters".into(), string(Optional, "Additional apply parameters.")),
                    ("init_parameters".into(), string(Optional, "Additional init parameters.")),
                    ("plugin_cache_directory".into(), string(Optional, "The plugin cache directory.")),
                    ("workspace".into(), string(Optional, "The Terraform workspace.")),
                ]),
                Blocks::new(),
            )),
        );

        let role = block(
            "An AWS role to assume.",
            Attributes::from([
                ("arn".into(), string(Optional, "The ARN of the role.")),
                ("external_id".into(), string(Optional, "The external ID.")),
                ("role_session_name".into(), string(Optional, "The role session name.")),
                (
                    "session_duration".into(),
                    number(Optional, "The session duration in seconds."),
                ),
            ]),
            Blocks::new(),
        );
        self.blocks.insert(
            "aws_account".into(),
            NestedBlock::Optional(block(
                "Run Terraform with AWS credentials.",
                Attributes::from([
                    ("region".into(), string(Optional, "The AWS region.")),
                    ("variable".into(), string(Optional, "The AWS account variable.")),
                    (
                        "use_instance_role".into(),
                        boolean(Optional, "Use the instance role of the worker."),
                    ),
                ]),
                Blocks::from([("role".into(), NestedBlock::Optional(role))]),
            )),
        );
        self.blocks.insert(
            "azure_account".into(),
            NestedBlock::Optional(block(
                "Run Terraform with Azure credentials.",
                Attributes::from([(
                    "variable".into(),
                    string(Optional, "The Azure account variable."),
                )]),
                Blocks::new(),
            )),
        );
        self.blocks.insert(
            "google_cloud_account".into(),
            NestedBlock::Optional(block(
                "Run Terraform with Google Cloud credentials.",
                Attributes::from([
                    ("variable".into(), string(Optional, "The Google Cloud account variable.")),
                    (
                        "use_vm_service_account".into(),
                        boolean(
                            Optional,
                            "When running in a Compute Engine virtual machine, use the associated VM service account.",
                        ),
                    ),
                    ("project".into(), string(Optional, "Sets the GOOGLE_PROJECT environment variable.")),
                    ("region".into(), string(Optional, "Sets the GOOGLE_REGION environment variable.")),
                    ("zone".into(), string(Optional, "Sets the GOOGLE_ZONE environment variable.")),
                    (
                        "service_account_emails".into(),
                        string(
                            Optional,
                            "Sets the GOOGLE_IMPERSONATE_SERVICE_ACCOUNT environment variable.",
                        ),
                    ),
                    (
                        "impersonate_service_account".into(),
                        boolean(Optional, "Impersonate service accounts."),
                    ),
                ]),
                Blocks::new(),
            )),
        );
        self.blocks.insert(
            "template".into(),
            NestedBlock::Optional(block(
                "Where the Terraform template comes from and how it is prepared.",
                Attributes::from([
                    (
                        "additional_variable_files".into(),
                        string(Optional, "Additional variable files, one per line."),
                    ),
                    ("directory".into(), string(Optional, "The template directory in the package.")),
                    (
                        "run_automatic_file_substitution".into(),
                        boolean(Optional, "Substitute variables in the template files."),
                    ),
                    ("target_files".into(), string(Optional, "Additional files to substitute.")),
                ]),
                Blocks::new(),
            )),
        );
        self.attributes.insert(
            "template_parameters".into(),
            string(Optional, "The template parameters, as JSON."),
        );
        self.attributes.insert(
            "inline_template".into(),
            string(Optional, "An inline Terraform template. When set, no package is used."),
        );
        self
    }

    pub fn build(self, description: impl ToString) -> NestedBlock {
        NestedBlock::List(Block {
            attributes: self.attributes,
            blocks: self.blocks,
            description: Description::markdown(description),
            ..Default::default()
        })
    }
}

fn git_dependency() -> Block {
    use AttributeConstraint::{Optional, Required};

    block(
        "Configuration for resources sourced from a git repository.",
        Attributes::from([
            (
                "repository_uri".into(),
                string(Required, "The Git URI of the repository the resource is sourced from."),
            ),
            (
                "default_branch".into(),
                string(Required, "Name of the default branch of the repository."),
            ),
            (
                "git_credential_type".into(),
                string(Required, "The Git credential authentication type."),
            ),
            (
                "file_path_filters".into(),
                string_list(Optional, "File path filters narrowing down where files are sourced from."),
            ),
            (
                "git_credential_id".into(),
                string(Optional, "ID of an existing Git credential."),
            ),
        ]),
        Blocks::new(),
    )
}

fn package(named: bool) -> Block {
    use AttributeConstraint::{Computed, OptionalComputed, Required};

    let mut attributes = Attributes::from([
        (
            "acquisition_location".into(),
            string(
                OptionalComputed,
                "Where to acquire the package: `Server`, `ExecutionTarget` or `NotAcquired`. Defaults to `Server`.",
            ),
        ),
        (
            "feed_id".into(),
            string(
                OptionalComputed,
                "The feed ID of this package reference. Defaults to `feeds-builtin`.",
            ),
        ),
        (
            "id".into(),
            string(Computed, "The ID of this package reference."),
        ),
        ("package_id".into(), string(Required, "The ID of the package.")),
        (
            "properties".into(),
            string_map(OptionalComputed, "Properties associated with this package reference."),
        ),
    ]);
    if named {
        attributes.insert(
            "name".into(),
            string(Required, "The name of this package reference."),
        );
        attributes.insert(
            "extract_during_deployment".into(),
            boolean(
                OptionalComputed,
                "Whether to extract the package during deployment. Defaults to `true`.",
            ),
        );
    }
    block("The package associated with this action.", attributes, Blocks::new())
}

fn windows_service() -> Attributes {
    use AttributeConstraint::{Optional, OptionalComputed, Required};

    Attributes::from([
        (
            "arguments".into(),
            string(Optional, "The command line arguments passed to the service when it starts."),
        ),
        (
            "create_or_update_service".into(),
            boolean(OptionalComputed, "Whether to create or update the service."),
        ),
        (
            "custom_account_name".into(),
            string(Optional, "The Windows/domain account the service runs under."),
        ),
        (
            "custom_account_password".into(),
            sensitive(string(OptionalComputed, "The password for the custom account.")),
        ),
        (
            "dependencies".into(),
            string(Optional, "Services this one depends on, separated by forward slashes (/)."),
        ),
        ("description".into(), string(Optional, "User-friendly description of the service.")),
        ("display_name".into(), string(Optional, "The display name of the service.")),
        (
            "executable_path".into(),
            string(Required, "The executable path relative to the package installation directory."),
        ),
        (
            "service_account".into(),
            string(
                OptionalComputed,
                "The built-in account the service runs under. Defaults to `LocalSystem`.",
            ),
        ),
        ("service_name".into(), string(Required, "The name of the service.")),
        (
            "start_mode".into(),
            string(
                OptionalComputed,
                "When the service starts: `auto`, `delayed-auto`, `manual`, `unchanged` or an expression. Defaults to `auto`.",
            ),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute_names(block: &NestedBlock) -> Vec<&str> {
        let NestedBlock::List(inner) = block else {
            panic!("action blocks are lists");
        };
        let mut names: Vec<&str> = inner.attributes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn base_block_has_shared_attributes() {
        let block = ActionSchemaBuilder::new().build("action");
        let names = attribute_names(&block);
        for key in ["id", "name", "properties", "sort_order", "computed_sort_order", "features"] {
            assert!(names.contains(&key), "missing {key}");
        }
        assert!(!names.contains(&"run_on_server"));
    }

    #[test]
    fn options_add_kind_attributes() {
        let block = ActionSchemaBuilder::new()
            .with_execution_location()
            .with_worker_pool()
            .with_script()
            .with_script_from_package()
            .with_namespace()
            .build("kubectl");
        let names = attribute_names(&block);
        for key in ["run_on_server", "worker_pool_id", "script_body", "script_source", "namespace"] {
            assert!(names.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn windows_service_password_is_sensitive() {
        let NestedBlock::List(block) = ActionSchemaBuilder::new().with_windows_service().build("svc") else {
            panic!("action blocks are lists");
        };
        assert!(block.attributes["custom_account_password"].sensitive);
        assert_eq!(
            block.attributes["service_name"].constraint,
            AttributeConstraint::Required
        );
    }

    #[test]
    fn terraform_template_nests_role_under_aws_account() {
        let NestedBlock::List(block) = ActionSchemaBuilder::new().with_terraform_template().build("tf") else {
            panic!("action blocks are lists");
        };
        let Some(NestedBlock::Optional(aws)) = block.blocks.get("aws_account") else {
            panic!("aws_account missing");
        };
        assert!(aws.blocks.contains_key("role"));
        assert!(block.attributes.contains_key("inline_template"));
    }
}
