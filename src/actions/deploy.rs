// src/actions/deploy.rs

use crate::actions::{
    params::{normalize_deploy, DeployIntent, RawParams},
    templates::DEPLOY_TEMPLATE,
    Action, ActionContext, ActionExample, ActionOutcome,
};
use crate::blockchain::registry::ChainDescriptor;
use crate::blockchain::to_checksum;
use crate::config::Config;
use crate::error::{ActionError, ActionResult};
use async_trait::async_trait;
use ethers::types::U256;
use ethers_core::abi::Token;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

const ERC20_SOURCE: &str = include_str!("../../contracts/Erc20Contract.sol");
const ERC721_SOURCE: &str = include_str!("../../contracts/Erc721Contract.sol");
const ERC1155_SOURCE: &str = include_str!("../../contracts/Erc1155Contract.sol");

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResult {
    pub contract_type: String,
    pub chain: String,
    pub address: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub explorer_url: String,
}

/// Source, contract name and constructor arguments for one contract kind.
pub fn deployment_plan(intent: &DeployIntent) -> (&'static str, &'static str, Vec<Token>) {
    match intent {
        DeployIntent::Erc20(spec) => (
            ERC20_SOURCE,
            "Erc20Contract",
            vec![
                Token::String(spec.name.clone()),
                Token::String(spec.symbol.clone()),
                Token::Uint(U256::from(spec.decimals)),
                Token::Uint(spec.total_supply),
            ],
        ),
        DeployIntent::Erc721(spec) => (
            ERC721_SOURCE,
            "Erc721Contract",
            vec![
                Token::String(spec.name.clone()),
                Token::String(spec.symbol.clone()),
                Token::String(spec.base_uri.clone()),
            ],
        ),
        DeployIntent::Erc1155(spec) => (
            ERC1155_SOURCE,
            "Erc1155Contract",
            vec![
                Token::String(spec.name.clone()),
                Token::String(spec.base_uri.clone()),
            ],
        ),
    }
}

pub async fn deploy(ctx: &ActionContext, chain: ChainDescriptor, intent: DeployIntent) -> ActionResult<DeployResult> {
    let (source, contract_name, args) = deployment_plan(&intent);
    info!("Compiling {} for deployment on {}", contract_name, chain.name);
    let artifact = ctx
        .compiler
        .compile(source, contract_name)
        .await
        .map_err(|e| ActionError::CompilationFailed(e.to_string()))?;

    let address = ctx.signer.deploy_contract(&chain, &artifact, &args).await?;
    let address = to_checksum(&address, None);
    info!("{} deployed at {} on {}", intent.kind(), address, chain.name);

    let (name, symbol) = match &intent {
        DeployIntent::Erc20(spec) => (spec.name.clone(), Some(spec.symbol.clone())),
        DeployIntent::Erc721(spec) => (spec.name.clone(), Some(spec.symbol.clone())),
        DeployIntent::Erc1155(spec) => (spec.name.clone(), None),
    };
    Ok(DeployResult {
        contract_type: intent.kind().to_string(),
        explorer_url: chain.address_url(&address),
        chain: chain.name,
        address,
        name,
        symbol,
    })
}

pub struct DeployAction;

#[async_trait]
impl Action for DeployAction {
    fn name(&self) -> &'static str {
        "DEPLOY_TOKEN"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["DEPLOY_CONTRACT", "CREATE_TOKEN", "DEPLOY_NFT", "DEPLOY_ERC20", "DEPLOY_ERC721", "DEPLOY_ERC1155"]
    }

    fn description(&self) -> &'static str {
        "Compile and deploy an ERC20, ERC721 or ERC1155 token contract."
    }

    fn template(&self) -> &'static str {
        DEPLOY_TEMPLATE
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "contractType": {"type": "string", "enum": ["ERC20", "ERC721", "ERC1155"]},
                "chain": {"type": "string", "description": "bsc, bscTestnet, opBNB or opBNBTestnet (default bsc)"},
                "name": {"type": "string"},
                "symbol": {"type": "string"},
                "decimals": {"type": "integer"},
                "totalSupply": {"type": "string", "description": "Whole tokens"},
                "baseURI": {"type": "string"}
            },
            "required": ["name"]
        })
    }

    fn examples(&self) -> Vec<ActionExample> {
        vec![
            ActionExample {
                user: "Deploy an ERC20 token named Demo with symbol DMO, 18 decimals and 1000000 supply on bscTestnet",
                params: json!({"contractType": "ERC20", "chain": "bscTestnet", "name": "Demo", "symbol": "DMO", "decimals": 18, "totalSupply": "1000000"}),
                agent: "Successfully deployed ERC20 Demo (DMO) at 0x...",
            },
            ActionExample {
                user: "Create an NFT collection called Apes (APE) with base URI ipfs://apes/",
                params: json!({"contractType": "ERC721", "name": "Apes", "symbol": "APE", "baseURI": "ipfs://apes/"}),
                agent: "Successfully deployed ERC721 Apes (APE) at 0x...",
            },
        ]
    }

    fn validate(&self, _config: &Config) -> bool {
        true
    }

    async fn run(&self, ctx: &ActionContext, raw: RawParams) -> ActionResult<ActionOutcome> {
        let (chain, intent) = normalize_deploy(ctx.signer.registry(), &raw)?;
        let result = deploy(ctx, chain, intent).await?;
        let label = match &result.symbol {
            Some(symbol) => format!("{} ({})", result.name, symbol),
            None => result.name.clone(),
        };
        Ok(ActionOutcome::new(
            format!(
                "Successfully deployed {} {} at {} on {}",
                result.contract_type, label, result.address, result.chain
            ),
            &result,
        ))
    }
}
