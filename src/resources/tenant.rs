use serde::{Deserialize, Serialize};
use tf_provider::{AttributePath, Diagnostics};
use tf_provider::schema::{AttributeConstraint, Block};

use super::ApiResourceKind;
use crate::error::Result;
use crate::mappers::tenant::{tenant_state, to_tenant};
use crate::model::Tenant;
use crate::plan::{carry, default_to};
use crate::schema::{self, Attributes};
use crate::validators;
use crate::value::{StringList, StringValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantState {
    pub id: StringValue,
    pub space_id: StringValue,
    pub name: StringValue,
    pub description: StringValue,
    pub cloned_from_tenant_id: StringValue,
    pub tenant_tags: StringList,
}

pub fn attributes() -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert("id".into(), schema::id());
    attributes.insert("space_id".into(), schema::space_id("tenant"));
    attributes.insert("name".into(), schema::name("tenant"));
    attributes.insert("description".into(), schema::description("tenant"));
    attributes.insert(
        "cloned_from_tenant_id".into(),
        schema::string(
            AttributeConstraint::Optional,
            "The ID of the tenant from which this tenant was cloned.",
        ),
    );
    attributes.insert(
        "tenant_tags".into(),
        schema::string_list(
            AttributeConstraint::OptionalComputed,
            "A list of tenant tags associated with this resource.",
        ),
    );
    attributes
}

pub struct TenantKind;

impl ApiResourceKind for TenantKind {
    type Model = Tenant;
    type State = TenantState;

    const TYPE_NAME: &'static str = "octopusdeploy_tenant";
    const DISPLAY_NAME: &'static str = "tenant";

    fn schema() -> Block {
        schema::block(
            "This resource manages tenants in Octopus Deploy.",
            attributes(),
            Default::default(),
        )
    }

    fn id(state: &TenantState) -> &StringValue {
        &state.id
    }

    fn space_id(state: &TenantState) -> &StringValue {
        &state.space_id
    }

    fn space_id_mut(state: &mut TenantState) -> &mut StringValue {
        &mut state.space_id
    }

    fn to_model(state: &TenantState, current: Option<&Tenant>) -> Result<Tenant> {
        Ok(to_tenant(state, current))
    }

    fn to_state(model: &Tenant, prior: Option<&TenantState>) -> Result<TenantState> {
        Ok(tenant_state(model, prior))
    }

    fn plan(planned: &mut TenantState, config: &TenantState, prior: Option<&TenantState>) {
        carry(&mut planned.id, &config.id, prior.map(|p| &p.id));
        default_to(&mut planned.description, &config.description, String::new());
        default_to(&mut planned.tenant_tags, &config.tenant_tags, Vec::new());
    }

    fn validate(diags: &mut Diagnostics, config: &TenantState) {
        validators::not_empty(diags, AttributePath::new("name"), &config.name);
    }
}
