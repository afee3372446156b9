use std::fs;
use std::path::{Path, PathBuf};

use iac_policy_engine::rules::{CompiledRules, FindingKind};
use iac_policy_engine::scan::{discover, NamingRuleEngine, RuleEngine, Scanner, TagRuleEngine};
use tempfile::TempDir;

const COMPLIANT_TF: &str = r#"
locals {
  key_vault_name       = "bidone-kv-dev-001"
  storage_account_name = "bidonestdev001"
}

resource "azurerm_resource_group" "integration" {
  name     = "bidone-rg-dev-001"
  location = "australiaeast"
}

resource "azurerm_key_vault" "order_vault" {
  name                       = "bidone-kv-dev-001"
  sku_name                   = "standard"
  soft_delete_retention_days = 7

  network_acls {
    default_action = "Deny"
    bypass         = "AzureServices"
  }

  tags = {
    Environment = "dev"
    Project     = "BidOne-Integration-Demo"
    ManagedBy   = "Terraform"
  }
}
"#;

const COMPLIANT_BICEP: &str = r#"
param location string = resourceGroup().location

resource orderQueue 'Microsoft.ServiceBus/namespaces@2022-10-01-preview' = {
  name: 'bidone-sb-dev-001'
  location: location
  sku: {
    name: 'Standard'
  }
  properties: {
    minimumTlsVersion: '1.2'
  }
  tags: {
    Environment: 'dev'
    Project: 'BidOne-Integration-Demo'
    ManagedBy: 'Bicep'
  }
}
"#;

fn write(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_compliant_sources_pass_both_engines() {
    let tmp = TempDir::new().unwrap();
    let tf = write(tmp.path(), "infra/terraform/main.tf", COMPLIANT_TF);
    let bicep = write(tmp.path(), "infra/bicep/main.bicep", COMPLIANT_BICEP);
    let rules = CompiledRules::default();

    let naming = Scanner::new(NamingRuleEngine::new(&rules))
        .scan(&[tf.clone(), bicep.clone()])
        .unwrap();
    assert_eq!(naming.files.len(), 2);
    assert!(naming.passed(), "{:?}", naming.files);

    let tags = Scanner::new(TagRuleEngine::new(&rules))
        .scan(&[tf, bicep])
        .unwrap();
    assert_eq!(tags.files.len(), 2);
    assert!(tags.passed(), "{:?}", tags.files);
}

#[test]
fn test_default_roots_are_discovered() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "infra/terraform/main.tf", COMPLIANT_TF);
    write(
        tmp.path(),
        "infra/terraform/modules/storage/main.tf",
        r#"resource "azurerm_storage_account" "Orders" {}"#,
    );
    write(tmp.path(), "infra/bicep/main.bicep", COMPLIANT_BICEP);

    let files = discover(tmp.path()).unwrap();
    assert_eq!(files.len(), 3);

    let rules = CompiledRules::default();
    let report = Scanner::new(NamingRuleEngine::new(&rules))
        .scan(&files)
        .unwrap();
    assert_eq!(report.total_findings(), 1);
    let finding = report.findings().next().unwrap();
    assert_eq!(finding.kind, FindingKind::ResourceNaming);
}

#[test]
fn test_naming_reports_one_finding_per_violation() {
    let tmp = TempDir::new().unwrap();
    let path = write(
        tmp.path(),
        "main.tf",
        r#"
locals {
  app_service_name = "bidone-api-dev"
}
"#,
    );
    let rules = CompiledRules::default();
    let findings = NamingRuleEngine::new(&rules).check_file(&path).unwrap();
    assert_eq!(findings.len(), 1);
    assert!(findings[0].kind.is_naming());
}

#[test]
fn test_tag_engine_flags_missing_block_and_project() {
    let tmp = TempDir::new().unwrap();
    let path = write(
        tmp.path(),
        "main.tf",
        r#"
resource "azurerm_key_vault" "order_vault" {
  name = "bidone-kv-dev-001"
}

resource "azurerm_storage_account" "orders" {
  name = "bidonestdev001"
  tags = {
    Environment = "dev"
    Project     = "Legacy-Project"
    ManagedBy   = "Terraform"
  }
}
"#,
    );
    let rules = CompiledRules::default();
    let findings = TagRuleEngine::new(&rules).check_file(&path).unwrap();
    let kinds: Vec<_> = findings.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![FindingKind::MissingTags, FindingKind::IncorrectProjectTag]
    );
}

#[test]
fn test_variables_file_default_tags() {
    let tmp = TempDir::new().unwrap();
    let path = write(
        tmp.path(),
        "infra/terraform/variables.tf",
        r#"
variable "environment" {
  type    = string
  default = "dev"
}

variable "tags" {
  type = map(string)
  default = {
    Project = "BidOne-Integration-Demo"
  }
}
"#,
    );
    let rules = CompiledRules::default();
    let report = Scanner::new(TagRuleEngine::new(&rules))
        .scan(&[path])
        .unwrap();
    let messages: Vec<_> = report.findings().map(|f| f.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Variable 'tags' default is missing required tag: Environment",
            "Variable 'tags' default is missing required tag: ManagedBy",
        ]
    );
}

#[test]
fn test_custom_rule_set_changes_expectations() {
    let tmp = TempDir::new().unwrap();
    let path = write(
        tmp.path(),
        "main.tf",
        r#"
resource "azurerm_key_vault" "order_vault" {
  tags = {
    CostCenter = "42"
    Project    = "Platform"
  }
}
"#,
    );
    let rules = CompiledRules::from_yaml(
        r#"
required_tags: ["CostCenter", "Project"]
expected_project: "Platform"
"#,
    )
    .unwrap();
    let findings = TagRuleEngine::new(&rules).check_file(&path).unwrap();
    assert!(findings.is_empty());

    let default_findings = TagRuleEngine::new(&CompiledRules::default())
        .check_file(&path)
        .unwrap();
    assert_eq!(default_findings.len(), 3);
}

#[test]
fn test_unreadable_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    // A directory with a source extension exists but cannot be read as text.
    let dir = tmp.path().join("broken.tf");
    fs::create_dir_all(&dir).unwrap();

    let rules = CompiledRules::default();
    let result = Scanner::new(NamingRuleEngine::new(&rules)).scan(&[dir]);
    assert!(result.is_err());
}
