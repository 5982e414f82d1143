use std::collections::HashMap;

use crate::encode::encode;
use crate::types::*;

fn record(sub: &str, client: &str, secret: &str, tenant: &str) -> CredentialRecord {
    CredentialRecord {
        subscription_id: SubscriptionId::new(sub),
        client_id: client.into(),
        client_secret: secret.into(),
        tenant_id: TenantId::new(tenant),
    }
}

fn two_records() -> Vec<CredentialRecord> {
    vec![
        record("sub1", "app1", "sec1", "ten1"),
        record("sub2", "app2", "sec2", "ten1"),
    ]
}

/// Minimal INI reader: section name -> key -> unquoted value.
fn parse_ini(text: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current = None;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }
        let (key, value) = line.split_once('=').expect("key = value line");
        let section = current.as_ref().expect("key outside of a section");
        sections
            .get_mut(section)
            .unwrap()
            .insert(key.trim().to_string(), value.trim().trim_matches('"').to_string());
    }
    sections
}

// ── encode ────────────────────────────────────────────────────────────────────

#[test]
fn chef_round_trips_through_ini() {
    let out = encode(&[record("sub1", "app1", "sec1", "ten1")], OutputStyle::Chef);
    let ini = parse_ini(&out);
    let sub1 = ini.get("sub1").expect("section sub1");
    assert_eq!(sub1.get("client_id").map(String::as_str), Some("app1"));
    assert_eq!(sub1.get("client_secret").map(String::as_str), Some("sec1"));
    assert_eq!(sub1.get("tenant_id").map(String::as_str), Some("ten1"));
}

#[test]
fn chef_exact_layout() {
    let out = encode(&[record("sub1", "app1", "sec1", "ten1")], OutputStyle::Chef);
    assert_eq!(
        out,
        "[sub1]\nclient_id = \"app1\"\nclient_secret = \"sec1\"\ntenant_id = \"ten1\"\n\n"
    );
}

#[test]
fn terraform_exact_layout() {
    let out = encode(&[record("S1", "app1", "sec1", "T1")], OutputStyle::Terraform);
    assert_eq!(
        out,
        "provider \"azurerm\" {\n  subscription_id = \"S1\"\n  client_id       = \"app1\"\n  client_secret   = \"sec1\"\n  tenant_id       = \"T1\"\n}\n\n"
    );
}

#[test]
fn puppet_exact_layout() {
    let out = encode(&[record("S1", "app1", "sec1", "T1")], OutputStyle::Puppet);
    assert_eq!(
        out,
        "azure: {\n subscription_id: \"S1\"\n tenant_id: 'T1'\n client_id: 'app1'\n client_secret: 'sec1'\n}\n\n"
    );
}

#[test]
fn generic_exact_layout() {
    let out = encode(&[record("S1", "app1", "sec1", "T1")], OutputStyle::Generic);
    assert_eq!(
        out,
        "azure_subscription_id = \"S1\"\nazure_tenant_id = \"T1\"\nazure_client_id = \"app1\"\nazure_client_secret = \"sec1\"\n\n"
    );
}

#[test]
fn every_style_renders_one_block_per_record_in_order() {
    let records = two_records();
    for style in [
        OutputStyle::Chef,
        OutputStyle::Puppet,
        OutputStyle::Terraform,
        OutputStyle::Generic,
    ] {
        let out = encode(&records, style);
        let blocks: Vec<&str> = out.split("\n\n").filter(|b| !b.is_empty()).collect();
        assert_eq!(blocks.len(), 2, "style {style}: {out}");
        for (block, r) in blocks.iter().zip(&records) {
            for field in [
                r.subscription_id.as_str(),
                r.client_id.as_str(),
                r.client_secret.as_str(),
                r.tenant_id.as_str(),
            ] {
                assert!(block.contains(field), "style {style}: block missing {field}: {block}");
            }
        }
        let first = out.find("sub1").unwrap();
        let second = out.find("sub2").unwrap();
        assert!(first < second, "style {style}: records out of order");
    }
}

#[test]
fn empty_record_list_renders_nothing() {
    for style in [
        OutputStyle::Chef,
        OutputStyle::Puppet,
        OutputStyle::Terraform,
        OutputStyle::Generic,
    ] {
        assert_eq!(encode(&[], style), "");
    }
}

#[test]
fn encode_is_deterministic() {
    let records = two_records();
    assert_eq!(
        encode(&records, OutputStyle::Terraform),
        encode(&records, OutputStyle::Terraform)
    );
}

// ── OutputStyle ───────────────────────────────────────────────────────────────

#[test]
fn unknown_empty_and_unset_styles_fall_back_to_generic() {
    let records = two_records();
    let generic = encode(&records, OutputStyle::Generic);
    for name in [Some("yaml"), Some(""), Some("CHEF"), None] {
        let style = OutputStyle::from_name(name);
        assert_eq!(style, OutputStyle::Generic, "name {name:?}");
        assert_eq!(encode(&records, style), generic);
    }
}

#[test]
fn known_style_names_resolve() {
    assert_eq!(OutputStyle::from_name(Some("chef")), OutputStyle::Chef);
    assert_eq!(OutputStyle::from_name(Some("puppet")), OutputStyle::Puppet);
    assert_eq!(OutputStyle::from_name(Some("terraform")), OutputStyle::Terraform);
    assert_eq!(OutputStyle::from_name(Some("generic")), OutputStyle::Generic);
}

// ── RoleName ──────────────────────────────────────────────────────────────────

#[test]
fn role_names_parse_case_insensitively() {
    assert_eq!("Contributor".parse::<RoleName>().unwrap(), RoleName::Contributor);
    assert_eq!("owner".parse::<RoleName>().unwrap(), RoleName::Owner);
    assert!("Reader".parse::<RoleName>().is_err());
    assert_eq!(RoleName::default(), RoleName::Contributor);
}

// ── Redaction ─────────────────────────────────────────────────────────────────

#[test]
fn secrets_are_not_debug_printed() {
    let rec = record("S1", "app1", "super-secret", "T1");
    assert!(!format!("{rec:?}").contains("super-secret"));

    let token = AccessToken::new("eyJ0eXAi");
    assert!(!format!("{token:?}").contains("eyJ0eXAi"));
}
