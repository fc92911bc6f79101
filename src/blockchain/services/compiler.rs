// src/blockchain/services/compiler.rs
//
// Solidity compilation through `solc --standard-json`. One source file in,
// one named contract's ABI and creation bytecode out.

use crate::blockchain::models::CompiledContract;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use ethers_core::abi::Abi;
use ethers_core::types::Bytes;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::Stdio;
use std::str::FromStr;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

#[async_trait]
pub trait SolidityCompiler: Send + Sync {
    async fn compile(&self, source: &str, contract_name: &str) -> Result<CompiledContract>;
}

#[derive(Debug, Clone)]
pub struct SolcCompiler {
    solc_path: PathBuf,
    include_path: PathBuf,
}

impl Default for SolcCompiler {
    fn default() -> Self {
        Self::new("solc", "node_modules")
    }
}

impl SolcCompiler {
    /// `include_path` is the directory holding `@openzeppelin/...`.
    pub fn new(solc_path: impl Into<PathBuf>, include_path: impl Into<PathBuf>) -> Self {
        Self {
            solc_path: solc_path.into(),
            include_path: include_path.into(),
        }
    }

    fn input(&self, file_name: &str, source: &str) -> Value {
        json!({
            "language": "Solidity",
            "sources": { file_name: { "content": source } },
            "settings": {
                "optimizer": { "enabled": true, "runs": 200 },
                "remappings": [
                    format!("@openzeppelin/={}/@openzeppelin/", self.include_path.display())
                ],
                "outputSelection": {
                    "*": { "*": ["abi", "evm.bytecode.object"] }
                }
            }
        })
    }
}

/// Pulls one contract out of solc's standard-json output, failing with the
/// compiler's own diagnostics when any error-severity entry is present.
pub fn parse_standard_json_output(
    output: &Value,
    file_name: &str,
    contract_name: &str,
) -> Result<CompiledContract> {
    let diagnostics: Vec<&Value> = output["errors"]
        .as_array()
        .map(|errs| errs.iter().collect())
        .unwrap_or_default();

    let errors: Vec<String> = diagnostics
        .iter()
        .filter(|e| e["severity"] == "error")
        .map(|e| {
            e["formattedMessage"]
                .as_str()
                .or_else(|| e["message"].as_str())
                .unwrap_or("unknown compiler error")
                .trim()
                .to_string()
        })
        .collect();
    if !errors.is_empty() {
        bail!("{}", errors.join("\n"));
    }
    for warning in diagnostics.iter().filter(|e| e["severity"] == "warning") {
        debug!("solc warning: {}", warning["message"].as_str().unwrap_or_default());
    }

    let contract = &output["contracts"][file_name][contract_name];
    if contract.is_null() {
        bail!("contract {} not found in {}", contract_name, file_name);
    }
    let abi: Abi = serde_json::from_value(contract["abi"].clone())
        .context("compiler produced an unreadable ABI")?;
    let object = contract["evm"]["bytecode"]["object"]
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("contract {} has no bytecode (is it abstract?)", contract_name))?;
    let bytecode = Bytes::from_str(object).context("compiler produced invalid bytecode hex")?;

    Ok(CompiledContract {
        name: contract_name.to_string(),
        abi,
        bytecode,
    })
}

#[async_trait]
impl SolidityCompiler for SolcCompiler {
    async fn compile(&self, source: &str, contract_name: &str) -> Result<CompiledContract> {
        let file_name = format!("{}.sol", contract_name);
        let input = serde_json::to_vec(&self.input(&file_name, source))?;

        let mut child = Command::new(&self.solc_path)
            .arg("--standard-json")
            .arg("--allow-paths")
            .arg(&self.include_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to start {}", self.solc_path.display()))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("solc stdin unavailable"))?;
        stdin.write_all(&input).await?;
        drop(stdin);

        let out = child.wait_with_output().await?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            warn!("solc exited with {}: {}", out.status, stderr);
            bail!("solc exited with {}: {}", out.status, stderr.trim());
        }
        let output: Value =
            serde_json::from_slice(&out.stdout).context("solc produced non-JSON output")?;
        parse_standard_json_output(&output, &file_name, contract_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_abi_and_bytecode() {
        let output = json!({
            "errors": [{"severity": "warning", "message": "unused variable"}],
            "contracts": {
                "Token.sol": {
                    "Token": {
                        "abi": [{"type": "constructor", "inputs": [{"name": "n", "type": "string"}], "stateMutability": "nonpayable"}],
                        "evm": {"bytecode": {"object": "6080604052"}}
                    }
                }
            }
        });
        let compiled = parse_standard_json_output(&output, "Token.sol", "Token").unwrap();
        assert_eq!(compiled.bytecode.len(), 5);
        assert!(compiled.abi.constructor().is_some());
    }

    #[test]
    fn error_diagnostics_are_surfaced() {
        let output = json!({
            "errors": [{
                "severity": "error",
                "formattedMessage": "ParserError: Expected ';' but got '}'",
                "message": "Expected ';'"
            }]
        });
        let err = parse_standard_json_output(&output, "Token.sol", "Token").unwrap_err();
        assert!(err.to_string().contains("ParserError"));
    }

    #[test]
    fn remapping_points_at_include_path() {
        let solc = SolcCompiler::new("solc", "/opt/contracts/node_modules");
        let input = solc.input("A.sol", "contract A {}");
        assert_eq!(
            input["settings"]["remappings"][0],
            "@openzeppelin/=/opt/contracts/node_modules/@openzeppelin/"
        );
    }
}
