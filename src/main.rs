use collator::{
    chain::{InMemoryMainChain, MainChain},
    collation::{CollationBuilder, verify_collation},
    config::Config,
    diagnostics::TracingSink,
    execution::{INTRINSIC_GAS, TransferExecutor},
    pool::TransactionQueue,
    state::ShardState,
    Transaction,
};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, H256, Signature, U256};
use tracing::info;

const SHARD_ID: u64 = 0;

/// Sign a plain value transfer
fn transfer(signer: &LocalWallet, to: Address, value: u64, nonce: u64) -> anyhow::Result<Transaction> {
    let mut tx = Transaction {
        from: signer.address(),
        to,
        value: U256::from(value),
        nonce,
        gas_price: U256::one(),
        gas_limit: INTRINSIC_GAS,
        data: Vec::new(),
        signature: Signature {
            r: U256::zero(),
            s: U256::zero(),
            v: 0,
        },
    };
    tx.signature = signer.sign_hash(tx.signing_hash())?;
    Ok(tx)
}

/// Entry point for the collator demo.
///
/// Loads configuration, sets up an in-memory main chain with one shard,
/// builds a collation from a handful of transfers and verifies it the way a
/// receiving node would.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/default.toml".to_string());
    let config = Config::load(&path)?;
    info!("Collator starting with config: {:?}", config);

    let alice = LocalWallet::from_bytes(H256::from_low_u64_be(1).as_bytes())?;
    let bob = LocalWallet::from_bytes(H256::from_low_u64_be(2).as_bytes())?;
    let coinbase = Address::repeat_byte(0xcc);

    let genesis = ShardState::with_balances(
        config.state.clone(),
        &[
            (alice.address(), U256::from(1_000_000u64)),
            (bob.address(), U256::from(1_000_000u64)),
            (coinbase, U256::one()),
        ],
    );

    // Mine until the previous period's start block exists
    let mut chain = InMemoryMainChain::new(config.chain.period_length);
    chain.add_shard(SHARD_ID, genesis);
    while chain.get_expected_period_number() < 2 {
        chain.mine_block(Address::zero(), chrono::Utc::now().timestamp() as u64);
    }
    info!("Main chain head at block #{}", chain.head().number);

    let mut queue = TransactionQueue::new(config.scheduling.policy_type);
    queue.add(transfer(&alice, bob.address(), 1_000, 0)?);
    queue.add(transfer(&bob, alice.address(), 250, 0)?);
    // stale nonce, dropped by the builder
    queue.add(transfer(&alice, bob.address(), 1, 0)?);
    queue.add(transfer(&alice, Address::repeat_byte(0x11), 42, 1)?);
    info!("Queued {} transactions ({})", queue.len(), queue.policy_name());

    let executor = TransferExecutor::new(config.collation.max_gas);
    let sink = TracingSink;
    let built = CollationBuilder::new(config.collation.clone(), &executor, &sink).build(
        &chain,
        SHARD_ID,
        H256::zero(),
        coinbase,
        &mut queue,
    )?;

    // A receiving node replays the collation against the same parent state
    let mut state = chain
        .shard(SHARD_ID)
        .ok_or_else(|| anyhow::anyhow!("shard {} missing", SHARD_ID))?
        .mk_poststate_of_collation_hash(H256::zero())?;
    verify_collation(&chain, &mut state, &built.collation, &executor, &sink)?;
    anyhow::ensure!(state == built.poststate, "replayed post-state diverged");

    let hash = chain
        .shard_mut(SHARD_ID)
        .ok_or_else(|| anyhow::anyhow!("shard {} missing", SHARD_ID))?
        .add_collation(built.collation.clone(), built.poststate)?;
    info!("Collation {:?} registered on shard {}", hash, SHARD_ID);

    println!("{}", serde_json::to_string_pretty(&built.collation)?);
    Ok(())
}
