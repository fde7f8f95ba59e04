use tf_provider::value::Value;

use crate::model::Tenant;
use crate::resources::tenant::TenantState;
use crate::value::{expand_list, flatten_list, non_empty, string, string_or_empty};

/// Connected projects are owned by other resources; an update echoes the server's copy.
pub fn to_tenant(state: &TenantState, current: Option<&Tenant>) -> Tenant {
    Tenant {
        id: non_empty(&state.id).map(str::to_string),
        name: string_or_empty(&state.name),
        description: string_or_empty(&state.description),
        cloned_from_tenant_id: non_empty(&state.cloned_from_tenant_id).map(str::to_string),
        tenant_tags: expand_list(&state.tenant_tags),
        space_id: non_empty(&state.space_id).map(str::to_string),
        project_environments: current
            .map(|tenant| tenant.project_environments.clone())
            .unwrap_or_default(),
    }
}

pub fn tenant_state(tenant: &Tenant, prior: Option<&TenantState>) -> TenantState {
    // An unset clone source stays null unless state tracked it as empty.
    let cloned_from_tenant_id = match (&tenant.cloned_from_tenant_id, prior) {
        (Some(id), _) if !id.is_empty() => string(id.as_str()),
        (_, Some(prior)) if matches!(prior.cloned_from_tenant_id, Value::Value(_)) => string(""),
        _ => Value::Null,
    };
    TenantState {
        id: string(tenant.id.clone().unwrap_or_default()),
        space_id: string(tenant.space_id.clone().unwrap_or_default()),
        name: string(tenant.name.as_str()),
        description: string(tenant.description.as_str()),
        cloned_from_tenant_id,
        tenant_tags: flatten_list(tenant.tenant_tags.iter().cloned()),
    }
}
