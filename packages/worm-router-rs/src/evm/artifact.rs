//! Compiled contract artifacts
//!
//! The WormRouter, TokenBridgeHelpers and ERC20Mock contracts are compiled
//! outside this repository. Their JSON artifacts are read at runtime, in
//! either of the two layouts in common use:
//!
//! ```text
//! Foundry:  { "abi": [...], "bytecode": { "object": "0x6080..." } }
//! Hardhat:  { "contractName": "WormRouter", "abi": [...], "bytecode": "0x6080..." }
//! ```

use alloy::dyn_abi::{DynSolValue, Specifier};
use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hardhat(String),
    Foundry { object: String },
}

#[derive(Debug, Deserialize)]
struct RawArtifact {
    #[serde(rename = "contractName")]
    contract_name: Option<String>,
    abi: JsonAbi,
    bytecode: RawBytecode,
}

/// ABI plus creation bytecode of a compiled contract
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Parse an artifact from JSON text
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let raw: RawArtifact = serde_json::from_str(json)
            .wrap_err_with(|| format!("Malformed artifact for {}", name))?;

        let hex_code = match raw.bytecode {
            RawBytecode::Hardhat(code) => code,
            RawBytecode::Foundry { object } => object,
        };
        let stripped = hex_code.strip_prefix("0x").unwrap_or(&hex_code);
        if stripped.is_empty() {
            return Err(eyre!(
                "Artifact for {} has no bytecode (abstract contract or interface?)",
                name
            ));
        }
        if stripped.contains("__$") {
            return Err(eyre!("Artifact for {} has unlinked library references", name));
        }
        let bytecode = hex::decode(stripped)
            .wrap_err_with(|| format!("Invalid bytecode hex in artifact for {}", name))?;

        Ok(Self {
            name: raw.contract_name.unwrap_or_else(|| name.to_string()),
            abi: raw.abi,
            bytecode: bytecode.into(),
        })
    }

    /// Load an artifact file
    pub fn load(name: &str, path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read artifact {}", path.display()))?;
        Self::from_json(name, &json)
    }

    /// Locate and load `name` under an artifacts directory
    ///
    /// Tries the Foundry layout (`<dir>/<name>.sol/<name>.json`) then a flat
    /// `<dir>/<name>.json`.
    pub fn find(artifacts_dir: &Path, name: &str) -> Result<Self> {
        let candidates = artifact_candidates(artifacts_dir, name);
        let path = candidates.iter().find(|p| p.exists()).ok_or_else(|| {
            eyre!(
                "Artifact for {} not found (looked in: {})",
                name,
                candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?;
        Self::load(name, path)
    }

    /// Number of constructor parameters declared in the ABI
    pub fn constructor_arity(&self) -> usize {
        self.abi
            .constructor
            .as_ref()
            .map(|c| c.inputs.len())
            .unwrap_or(0)
    }

    /// Creation code followed by the ABI-encoded constructor arguments
    ///
    /// Arguments are checked against the ABI's constructor before encoding.
    pub fn deploy_code(&self, args: &[DynSolValue]) -> Result<Bytes> {
        let arity = self.constructor_arity();
        if args.len() != arity {
            return Err(eyre!(
                "{} constructor takes {} arguments, got {}",
                self.name,
                arity,
                args.len()
            ));
        }

        if let Some(constructor) = &self.abi.constructor {
            for (param, value) in constructor.inputs.iter().zip(args) {
                let ty = param.resolve().wrap_err_with(|| {
                    format!("Unsupported constructor type {} in {}", param.ty, self.name)
                })?;
                if !ty.matches(value) {
                    return Err(eyre!(
                        "{} constructor argument '{}' expects {}",
                        self.name,
                        param.name,
                        param.ty
                    ));
                }
            }
        }

        let mut code = self.bytecode.to_vec();
        if !args.is_empty() {
            code.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
        }
        Ok(code.into())
    }
}

fn artifact_candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![
        dir.join(format!("{}.sol", name)).join(format!("{}.json", name)),
        dir.join(format!("{}.json", name)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};

    const ROUTER_ABI: &str = r#"[
        {"type":"constructor","inputs":[
            {"name":"wormholeRelayer","type":"address","internalType":"address"},
            {"name":"chainId","type":"uint16","internalType":"uint16"}
        ],"stateMutability":"nonpayable"}
    ]"#;

    fn foundry_json() -> String {
        format!(r#"{{"abi":{},"bytecode":{{"object":"0x6080604052"}}}}"#, ROUTER_ABI)
    }

    #[test]
    fn test_parse_foundry_artifact() {
        let artifact = ContractArtifact::from_json("WormRouter", &foundry_json()).unwrap();
        assert_eq!(artifact.name, "WormRouter");
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(artifact.constructor_arity(), 2);
    }

    #[test]
    fn test_parse_hardhat_artifact() {
        let json = r#"{"contractName":"ERC20Mock","abi":[],"bytecode":"0x6080"}"#;
        let artifact = ContractArtifact::from_json("Mock", json).unwrap();
        assert_eq!(artifact.name, "ERC20Mock");
        assert_eq!(artifact.constructor_arity(), 0);
    }

    #[test]
    fn test_empty_bytecode_rejected() {
        let json = r#"{"abi":[],"bytecode":"0x"}"#;
        assert!(ContractArtifact::from_json("IWormhole", json).is_err());
    }

    #[test]
    fn test_deploy_code_appends_constructor_args() {
        let artifact = ContractArtifact::from_json("WormRouter", &foundry_json()).unwrap();
        let relayer = address!("A3cF45939bD6260bcFe3D66bc73d60f19e49a8BB");
        let code = artifact
            .deploy_code(&[
                DynSolValue::Address(relayer),
                DynSolValue::Uint(U256::from(6u16), 16),
            ])
            .unwrap();

        // 5 bytes of code + two 32-byte words
        assert_eq!(code.len(), 5 + 64);
        assert_eq!(&code[5 + 12..5 + 32], relayer.as_slice());
        assert_eq!(code[5 + 63], 6);
    }

    #[test]
    fn test_deploy_code_checks_arity_and_types() {
        let artifact = ContractArtifact::from_json("WormRouter", &foundry_json()).unwrap();
        assert!(artifact.deploy_code(&[]).is_err());
        assert!(artifact
            .deploy_code(&[DynSolValue::Bool(true), DynSolValue::Uint(U256::from(6u16), 16)])
            .is_err());
    }

    #[test]
    fn test_find_reports_missing_artifact() {
        let dir = std::env::temp_dir().join("worm-router-no-artifacts");
        let err = ContractArtifact::find(&dir, "WormRouter").unwrap_err();
        assert!(err.to_string().contains("WormRouter.sol"));
    }
}
