use crate::types::{CredentialRecord, OutputStyle};

/// Render credential records in the syntax of the chosen consumer tool.
///
/// One block per record, in input order, each followed by a blank line.
pub fn encode(records: &[CredentialRecord], style: OutputStyle) -> String {
    let mut out = String::new();
    for record in records {
        let block = match style {
            OutputStyle::Chef => render_chef(record),
            OutputStyle::Terraform => render_terraform(record),
            OutputStyle::Puppet => render_puppet(record),
            OutputStyle::Generic => render_generic(record),
        };
        out.push_str(&block);
        out.push('\n');
    }
    out
}

/// Knife/chef-provisioning credentials file section.
fn render_chef(r: &CredentialRecord) -> String {
    format!(
        "[{}]\nclient_id = \"{}\"\nclient_secret = \"{}\"\ntenant_id = \"{}\"\n",
        r.subscription_id, r.client_id, r.client_secret, r.tenant_id
    )
}

/// azurerm provider block.
fn render_terraform(r: &CredentialRecord) -> String {
    format!(
        "provider \"azurerm\" {{\n  subscription_id = \"{}\"\n  client_id       = \"{}\"\n  client_secret   = \"{}\"\n  tenant_id       = \"{}\"\n}}\n",
        r.subscription_id, r.client_id, r.client_secret, r.tenant_id
    )
}

/// puppetlabs-azure hash.
fn render_puppet(r: &CredentialRecord) -> String {
    format!(
        "azure: {{\n subscription_id: \"{}\"\n tenant_id: '{}'\n client_id: '{}'\n client_secret: '{}'\n}}\n",
        r.subscription_id, r.tenant_id, r.client_id, r.client_secret
    )
}

fn render_generic(r: &CredentialRecord) -> String {
    format!(
        "azure_subscription_id = \"{}\"\nazure_tenant_id = \"{}\"\nazure_client_id = \"{}\"\nazure_client_secret = \"{}\"\n",
        r.subscription_id, r.tenant_id, r.client_id, r.client_secret
    )
}
