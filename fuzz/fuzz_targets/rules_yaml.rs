#![no_main]

use iac_policy_engine::rules::CompiledRules;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Bad YAML and bad patterns are errors, never panics
    let _ = CompiledRules::from_yaml(data);
});
