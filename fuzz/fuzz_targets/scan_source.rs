#![no_main]

use arbitrary::Arbitrary;
use iac_policy_engine::rules::CompiledRules;
use iac_policy_engine::scan::{NamingRuleEngine, RuleEngine, SourceSyntax, TagRuleEngine};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    bicep: bool,
    variables_file: bool,
    content: String,
}

fuzz_target!(|input: FuzzInput| {
    let rules = CompiledRules::default();
    let (syntax, file_name) = match (input.bicep, input.variables_file) {
        (true, _) => (SourceSyntax::Bicep, "main.bicep"),
        (false, true) => (SourceSyntax::Terraform, "variables.tf"),
        (false, false) => (SourceSyntax::Terraform, "main.tf"),
    };

    // Arbitrary source text must never panic either engine
    let _ = NamingRuleEngine::new(&rules).check_source(syntax, file_name, &input.content);
    let _ = TagRuleEngine::new(&rules).check_source(syntax, file_name, &input.content);
});
