// Extraction prompts for the host's LLM step. `{{recentMessages}}` and
// `{{walletInfo}}` are filled in by the host.

pub const BALANCE_TEMPLATE: &str = r#"Given the recent messages and wallet information below:

{{recentMessages}}

{{walletInfo}}

Extract the following information about the requested balance check:
- Chain to check on. Must be one of ["bsc", "bscTestnet", "opBNB", "opBNBTestnet"]. Default is "bsc".
- Address to check. Optional, must be a valid 0x address or a .bnb name. Default is the agent's own wallet.
- Token symbol or contract address. Optional; leave null for the native token.

Respond with a JSON markdown block containing only the extracted values:

```json
{
    "chain": "bsc" | "bscTestnet" | "opBNB" | "opBNBTestnet",
    "address": string | null,
    "token": string | null
}
```
"#;

pub const TRANSFER_TEMPLATE: &str = r#"Given the recent messages and wallet information below:

{{recentMessages}}

{{walletInfo}}

Extract the following information about the requested transfer:
- Chain to execute on. Must be one of ["bsc", "bscTestnet", "opBNB", "opBNBTestnet"]. Default is "bsc".
- Token symbol or address. Optional; leave null to transfer the native token.
- Amount to transfer. Optional, must be a string of digits like "0.1". Leave null to send the whole balance.
- Recipient address or .bnb name. Must be a valid 0x address or a name like "alice.bnb".
- Data to attach. Optional, 0x-prefixed hex; only for native transfers.

Respond with a JSON markdown block containing only the extracted values:

```json
{
    "chain": "bsc" | "bscTestnet" | "opBNB" | "opBNBTestnet",
    "token": string | null,
    "amount": string | null,
    "toAddress": string,
    "data": string | null
}
```
"#;

pub const SWAP_TEMPLATE: &str = r#"Given the recent messages and wallet information below:

{{recentMessages}}

{{walletInfo}}

Extract the following information about the requested token swap:
- Input token symbol or address (the token being sold).
- Output token symbol or address (the token being bought).
- Amount to swap, as a string of digits like "0.1", in units of the input token.
- Chain to execute on. Only "bsc" is supported.
- Slippage tolerance. Optional, a fraction like 0.005 for 0.5%.

Respond with a JSON markdown block containing only the extracted values:

```json
{
    "chain": "bsc",
    "fromToken": string,
    "toToken": string,
    "amount": string,
    "slippage": number | null
}
```
"#;

pub const BRIDGE_TEMPLATE: &str = r#"Given the recent messages and wallet information below:

{{recentMessages}}

{{walletInfo}}

Extract the following information about the requested bridge transfer:
- Source chain. Must be "bsc" or "opBNB".
- Destination chain. Must be "opBNB" when the source is "bsc", and "bsc" when the source is "opBNB".
- Token address on the source chain. Optional; leave null for the native token.
- Token address on the destination chain. Required only when the source token is set.
- Amount to bridge, as a string of digits like "0.1".
- Recipient address on the destination chain. Optional; defaults to the agent's own wallet.

Respond with a JSON markdown block containing only the extracted values:

```json
{
    "fromChain": "bsc" | "opBNB",
    "toChain": "bsc" | "opBNB",
    "fromToken": string | null,
    "toToken": string | null,
    "amount": string,
    "toAddress": string | null
}
```
"#;

pub const STAKE_TEMPLATE: &str = r#"Given the recent messages and wallet information below:

{{recentMessages}}

{{walletInfo}}

Extract the following information about the requested staking operation:
- Action: one of "deposit", "withdraw" or "claim".
- Amount. Required for deposit (in BNB). Optional for withdraw (in slisBNB; null withdraws everything). Ignored for claim.

Respond with a JSON markdown block containing only the extracted values:

```json
{
    "action": "deposit" | "withdraw" | "claim",
    "amount": string | null
}
```
"#;

pub const FAUCET_TEMPLATE: &str = r#"Given the recent messages and wallet information below:

{{recentMessages}}

{{walletInfo}}

Extract the following information about the requested testnet faucet drip:
- Token to request. Must be exactly one of ["BNB", "BTC", "BUSD", "DAI", "ETH", "USDC"]. Default is "BNB".
- Recipient address. Optional; defaults to the agent's own wallet.

Respond with a JSON markdown block containing only the extracted values:

```json
{
    "token": "BNB" | "BTC" | "BUSD" | "DAI" | "ETH" | "USDC",
    "toAddress": string | null
}
```
"#;

pub const DEPLOY_TEMPLATE: &str = r#"Given the recent messages and wallet information below:

{{recentMessages}}

{{walletInfo}}

Extract the following information about the requested contract deployment:
- Contract type: one of "ERC20", "ERC721" or "ERC1155". Default is "ERC20".
- Chain to deploy on. Must be one of ["bsc", "bscTestnet", "opBNB", "opBNBTestnet"]. Default is "bsc".
- Name. Always required.
- Symbol. Required for ERC20 and ERC721.
- Decimals. Required for ERC20.
- Total supply in whole tokens. Required for ERC20.
- Base URI for token metadata. Required for ERC721 and ERC1155.

Respond with a JSON markdown block containing only the extracted values:

```json
{
    "contractType": "ERC20" | "ERC721" | "ERC1155",
    "chain": "bsc" | "bscTestnet" | "opBNB" | "opBNBTestnet",
    "name": string,
    "symbol": string | null,
    "decimals": number | null,
    "totalSupply": string | null,
    "baseURI": string | null
}
```
"#;
