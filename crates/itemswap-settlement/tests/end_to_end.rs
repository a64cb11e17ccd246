//! End-to-end integration tests across types, core, assets and settlement.
//!
//! These tests exercise the full order lifecycle:
//! maker signs -> owners approve the exchange -> taker fills / maker cancels
//!
//! They verify that the planes work together in realistic scenarios:
//! the two-items-for-100 swap, cancel-then-fill, expiry, wrong caller,
//! forged amounts, rollback of a half-completed fill, journal restart and
//! concurrent fills of one order.

use std::sync::{Arc, Barrier};
use std::thread;

use alloy_primitives::U256;
use itemswap_assets::{AssetRegistry, FungibleLedger, ItemLedger, SharedAsset};
use itemswap_core::testing::TestKey;
use itemswap_settlement::*;
use itemswap_types::*;

const NOW: i64 = 1_700_000_000;
const VU_AMOUNT: u64 = 100;
const EXCHANGE: Address = Address::new([0xEE; 20]);
const VU_TOKEN: Address = Address::new([0xF0; 20]);
const ITEM_TOKEN: Address = Address::new([0x1E; 20]);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn item(n: u64) -> U256 {
    U256::from(n)
}

/// Helper: an exchange with one fungible and one item collaborator.
struct Exchange<L: FillLedger> {
    executor: SwapExecutor<L>,
    vu: SharedAsset<FungibleLedger>,
    items: SharedAsset<ItemLedger>,
}

impl Exchange<InMemoryFillLedger> {
    fn new() -> Self {
        Self::with_ledger(InMemoryFillLedger::new())
    }
}

impl<L: FillLedger> Exchange<L> {
    fn with_ledger(ledger: L) -> Self {
        init_tracing();
        let vu = SharedAsset::new(FungibleLedger::new("VU"));
        let items = SharedAsset::new(ItemLedger::new("VUI"));
        let mut assets = AssetRegistry::new();
        assets.register_fungible(VU_TOKEN, vu.clone()).unwrap();
        assets.register_item(ITEM_TOKEN, items.clone()).unwrap();

        let config = SwapConfig::new(EXCHANGE, VU_TOKEN, ITEM_TOKEN);
        let executor = SwapExecutor::new(&config, assets, ledger)
            .unwrap()
            .with_clock(FixedClock::at_unix(NOW));
        Self {
            executor,
            vu,
            items,
        }
    }

    /// `owner` gets `amount` VU and approves the exchange for it.
    fn fund(&self, owner: Address, amount: u64) {
        self.vu.write(|l| {
            l.mint(owner, U256::from(amount)).unwrap();
            l.approve(owner, EXCHANGE, U256::from(amount));
        });
    }

    /// `owner` gets units 1 and 2 and approves the exchange as operator.
    fn stock(&self, owner: Address) {
        self.items.write(|l| {
            l.mass_mint(owner, &[item(1), item(2)], &["uri1", "uri2"])
                .unwrap();
            l.set_approval_for_all(owner, EXCHANGE, true);
        });
    }

    fn vu_balance(&self, owner: Address) -> U256 {
        self.vu.read(|l| l.balance_of(owner))
    }

    fn owner_of(&self, unit: u64) -> Option<Address> {
        self.items.read(|l| l.owner_of(item(unit)))
    }

    fn sign(&self, key: &TestKey, order: &Order) -> SignatureTriple {
        key.sign_order(self.executor.validator().hasher(), order, SigningScheme::EthSign)
    }
}

/// Maker sells items 1 and 2 for 100 VU to `taker`.
fn sell_items(maker: Address, taker: Address) -> Order {
    Order {
        maker,
        maker_token: ITEM_TOKEN,
        maker_receiver: maker,
        maker_values: vec![item(1), item(2)],
        taker: Taker::Restricted(taker),
        taker_token: VU_TOKEN,
        taker_values: vec![U256::from(VU_AMOUNT)],
        expiration: (NOW + 3_600) as u64,
        nonce: U256::from(1),
    }
}

/// Maker buys items 1 and 2 from `taker` for 100 VU; the items go to `wallet`.
fn buy_items(maker: Address, wallet: Address, taker: Address) -> Order {
    Order {
        maker,
        maker_token: VU_TOKEN,
        maker_receiver: wallet,
        maker_values: vec![U256::from(VU_AMOUNT)],
        taker: Taker::Restricted(taker),
        taker_token: ITEM_TOKEN,
        taker_values: vec![item(1), item(2)],
        expiration: (NOW + 3_600) as u64,
        nonce: U256::from(2),
    }
}

// =========================================================================
// Scenario: two items for 100 VU
// =========================================================================

#[test]
fn maker_sells_two_items_for_vu() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);
    ex.stock(maker.address());
    ex.fund(user, VU_AMOUNT);

    let order = sell_items(maker.address(), user);
    let sig = ex.sign(&maker, &order);

    assert_eq!(ex.executor.validate(&order, &sig, user).code, SwapCode::Ok);
    assert_eq!(ex.executor.fill(&order, &sig, user).unwrap(), SwapCode::Ok);

    assert_eq!(ex.owner_of(1), Some(user));
    assert_eq!(ex.owner_of(2), Some(user));
    assert_eq!(ex.vu_balance(user), U256::ZERO);
    assert_eq!(ex.vu_balance(maker.address()), U256::from(VU_AMOUNT));
    assert!(ex.executor.is_consumed(&ex.executor.hash(&order)));
}

#[test]
fn crowdsale_pays_the_receiving_wallet() {
    let mut ex = Exchange::new();
    let middleware = TestKey::new(3);
    let user = Address::repeat_byte(0x22);
    let wallet = Address::repeat_byte(0x44);
    ex.stock(middleware.address());
    ex.fund(user, VU_AMOUNT);

    let mut order = sell_items(middleware.address(), user);
    order.maker_receiver = wallet;
    let sig = ex.sign(&middleware, &order);

    assert_eq!(ex.executor.fill(&order, &sig, user).unwrap(), SwapCode::Ok);
    assert_eq!(ex.owner_of(1), Some(user));
    assert_eq!(ex.owner_of(2), Some(user));
    assert_eq!(ex.vu_balance(user), U256::ZERO);
    assert_eq!(ex.vu_balance(wallet), U256::from(VU_AMOUNT));
    assert_eq!(ex.vu_balance(middleware.address()), U256::ZERO);
}

#[test]
fn user_buys_items_delivered_to_a_separate_wallet() {
    let mut ex = Exchange::new();
    let user = TestKey::new(2);
    let middleware = Address::repeat_byte(0x33);
    let wallet = Address::repeat_byte(0x44);
    ex.fund(user.address(), VU_AMOUNT);
    ex.stock(middleware);

    let order = buy_items(user.address(), wallet, middleware);
    let sig = ex.sign(&user, &order);

    assert_eq!(ex.executor.fill(&order, &sig, middleware).unwrap(), SwapCode::Ok);
    assert_eq!(ex.owner_of(1), Some(wallet));
    assert_eq!(ex.owner_of(2), Some(wallet));
    assert_eq!(ex.vu_balance(user.address()), U256::ZERO);
    assert_eq!(ex.vu_balance(middleware), U256::from(VU_AMOUNT));
}

#[test]
fn user_sells_items_for_vu() {
    let mut ex = Exchange::new();
    let buyer = TestKey::new(2);
    let seller = Address::repeat_byte(0x11);
    ex.fund(buyer.address(), VU_AMOUNT);
    ex.stock(seller);

    let order = buy_items(buyer.address(), buyer.address(), seller);
    let sig = ex.sign(&buyer, &order);

    assert_eq!(ex.executor.fill(&order, &sig, seller).unwrap(), SwapCode::Ok);
    assert_eq!(ex.vu_balance(seller), U256::from(VU_AMOUNT));
    assert_eq!(ex.owner_of(1), Some(buyer.address()));
    assert_eq!(ex.owner_of(2), Some(buyer.address()));
    assert_eq!(ex.vu_balance(buyer.address()), U256::ZERO);
}

#[test]
fn second_fill_is_invalid_fill() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);
    ex.stock(maker.address());
    ex.fund(user, 2 * VU_AMOUNT);

    let order = sell_items(maker.address(), user);
    let sig = ex.sign(&maker, &order);
    assert_eq!(ex.executor.fill(&order, &sig, user).unwrap(), SwapCode::Ok);
    assert_eq!(
        ex.executor.fill(&order, &sig, user).unwrap(),
        SwapCode::InvalidFill
    );
    assert_eq!(ex.vu_balance(user), U256::from(VU_AMOUNT));
}

// =========================================================================
// Scenario: cancel then fill
// =========================================================================

#[test]
fn cancelled_order_cannot_be_filled() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);
    ex.stock(maker.address());
    ex.fund(user, VU_AMOUNT);

    let order = sell_items(maker.address(), user);
    let sig = ex.sign(&maker, &order);

    assert_eq!(
        ex.executor.cancel(&order, &sig, maker.address()).unwrap(),
        SwapCode::Ok
    );
    assert_eq!(
        ex.executor.fill(&order, &sig, user).unwrap(),
        SwapCode::InvalidFill
    );
    assert_eq!(ex.owner_of(1), Some(maker.address()));
    assert_eq!(ex.vu_balance(user), U256::from(VU_AMOUNT));

    let entry = ex.executor.ledger().entry(&ex.executor.hash(&order)).unwrap();
    assert_eq!(entry.kind, ConsumeKind::Cancel);
}

#[test]
fn stranger_cannot_cancel() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);
    let order = sell_items(maker.address(), user);
    let sig = ex.sign(&maker, &order);

    assert_eq!(
        ex.executor.cancel(&order, &sig, user).unwrap(),
        SwapCode::InvalidMaker
    );
    assert!(ex.executor.ledger().is_empty());
}

// =========================================================================
// Scenario: expiry, wrong caller, forged pairs
// =========================================================================

#[test]
fn expired_order_rejected_but_cancellable() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);
    ex.stock(maker.address());
    ex.fund(user, VU_AMOUNT);

    let mut order = sell_items(maker.address(), user);
    order.expiration = (NOW - 1) as u64;
    let sig = ex.sign(&maker, &order);

    assert_eq!(
        ex.executor.fill(&order, &sig, user).unwrap(),
        SwapCode::Expired
    );
    assert_eq!(ex.owner_of(1), Some(maker.address()));
    assert_eq!(
        ex.executor.cancel(&order, &sig, maker.address()).unwrap(),
        SwapCode::Ok
    );
}

#[test]
fn third_party_fill_rejected() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);
    let stranger = Address::repeat_byte(0x99);
    ex.stock(maker.address());
    ex.fund(stranger, VU_AMOUNT);

    let order = sell_items(maker.address(), user);
    let sig = ex.sign(&maker, &order);
    assert_eq!(
        ex.executor.fill(&order, &sig, stranger).unwrap(),
        SwapCode::InvalidTaker
    );
    assert_eq!(ex.vu_balance(stranger), U256::from(VU_AMOUNT));
}

#[test]
fn open_order_fillable_by_anyone() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let anyone = Address::repeat_byte(0x99);
    ex.stock(maker.address());
    ex.fund(anyone, VU_AMOUNT);

    let mut order = sell_items(maker.address(), Address::ZERO);
    order.taker = Taker::Open;
    let sig = ex.sign(&maker, &order);
    assert_eq!(ex.executor.fill(&order, &sig, anyone).unwrap(), SwapCode::Ok);
    assert_eq!(ex.owner_of(2), Some(anyone));
}

#[test]
fn same_class_and_unknown_pairs_are_invalid_address() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);

    let mut vu_for_vu = sell_items(maker.address(), user);
    vu_for_vu.maker_token = VU_TOKEN;
    vu_for_vu.maker_values = vec![U256::from(5)];
    let sig = ex.sign(&maker, &vu_for_vu);
    assert_eq!(
        ex.executor.fill(&vu_for_vu, &sig, user).unwrap(),
        SwapCode::InvalidAddress
    );

    let mut unknown = sell_items(maker.address(), user);
    unknown.taker_token = Address::repeat_byte(0x55);
    let sig = ex.sign(&maker, &unknown);
    assert_eq!(
        ex.executor.fill(&unknown, &sig, user).unwrap(),
        SwapCode::InvalidAddress
    );
}

#[test]
fn fake_amount_is_invalid_sign() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);
    ex.stock(maker.address());
    ex.fund(user, VU_AMOUNT);

    let order = sell_items(maker.address(), user);
    let sig = ex.sign(&maker, &order);
    let mut forged = order.clone();
    forged.taker_values = vec![U256::from(1)];

    assert_eq!(
        ex.executor.fill(&forged, &sig, user).unwrap(),
        SwapCode::InvalidSign
    );
    assert_eq!(ex.owner_of(1), Some(maker.address()));
}

#[test]
fn bad_value_shapes_are_invalid_values() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);

    let mut two_quantities = sell_items(maker.address(), user);
    two_quantities.taker_values = vec![U256::from(50), U256::from(50)];
    let sig = ex.sign(&maker, &two_quantities);
    assert_eq!(
        ex.executor.fill(&two_quantities, &sig, user).unwrap(),
        SwapCode::InvalidValues
    );

    let mut duplicate_units = sell_items(maker.address(), user);
    duplicate_units.maker_values = vec![item(1), item(1)];
    let sig = ex.sign(&maker, &duplicate_units);
    assert_eq!(
        ex.executor.fill(&duplicate_units, &sig, user).unwrap(),
        SwapCode::InvalidValues
    );
}

// =========================================================================
// Atomicity
// =========================================================================

/// Item collaborator that refuses to actually move one unit, even though its
/// preflight check passes. Simulates a collaborator changing state between
/// check and transfer.
struct FlakyItems {
    inner: SharedAsset<ItemLedger>,
    refuse: U256,
}

impl ItemAsset for FlakyItems {
    fn check_transfer_from(
        &self,
        spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> std::result::Result<(), TransferError> {
        ItemAsset::check_transfer_from(&self.inner, spender, owner, recipient, unit_id)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> std::result::Result<(), TransferError> {
        if unit_id == self.refuse {
            return Err(TransferError::Rejected("paused".to_string()));
        }
        ItemAsset::transfer_from(&mut self.inner, spender, owner, recipient, unit_id)
    }

    fn revert_transfer(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> std::result::Result<(), TransferError> {
        ItemAsset::revert_transfer(&mut self.inner, spender, owner, recipient, unit_id)
    }
}

#[test]
fn half_completed_fill_is_rolled_back() {
    init_tracing();
    let vu = SharedAsset::new(FungibleLedger::new("VU"));
    let items = SharedAsset::new(ItemLedger::new("VUI"));
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);

    vu.write(|l| {
        l.mint(user, U256::from(VU_AMOUNT)).unwrap();
        l.approve(user, EXCHANGE, U256::from(VU_AMOUNT));
    });
    items.write(|l| {
        l.mass_mint(maker.address(), &[item(1), item(2)], &["uri1", "uri2"])
            .unwrap();
        l.approve(maker.address(), EXCHANGE, item(1)).unwrap();
        l.approve(maker.address(), EXCHANGE, item(2)).unwrap();
    });

    let mut assets = AssetRegistry::new();
    assets.register_fungible(VU_TOKEN, vu.clone()).unwrap();
    assets
        .register_item(
            ITEM_TOKEN,
            FlakyItems {
                inner: items.clone(),
                refuse: item(2),
            },
        )
        .unwrap();
    let config = SwapConfig::new(EXCHANGE, VU_TOKEN, ITEM_TOKEN);
    let mut executor = SwapExecutor::new(&config, assets, InMemoryFillLedger::new())
        .unwrap()
        .with_clock(FixedClock::at_unix(NOW));

    let order = sell_items(maker.address(), user);
    let sig = maker.sign_order(
        executor.validator().hasher(),
        &order,
        SigningScheme::EthSign,
    );

    // VU leg and unit 1 succeed, unit 2 fails.
    let err = executor.fill(&order, &sig, user).unwrap_err();
    assert!(
        matches!(&err, SwapError::Transfer { token, source: TransferError::Rejected(_) } if *token == ITEM_TOKEN),
        "Got: {err:?}"
    );

    // Every balance, owner and approval is back where it started.
    assert_eq!(vu.read(|l| l.balance_of(user)), U256::from(VU_AMOUNT));
    assert_eq!(vu.read(|l| l.balance_of(maker.address())), U256::ZERO);
    assert_eq!(vu.read(|l| l.allowance(user, EXCHANGE)), U256::from(VU_AMOUNT));
    assert_eq!(items.read(|l| l.owner_of(item(1))), Some(maker.address()));
    assert_eq!(items.read(|l| l.get_approved(item(1))), Some(EXCHANGE));
    assert_eq!(items.read(|l| l.owner_of(item(2))), Some(maker.address()));
    assert!(!executor.is_consumed(&executor.hash(&order)));
}

/// Ledger whose commit always fails.
#[derive(Debug, Default)]
struct ReadOnlyLedger(InMemoryFillLedger);

impl itemswap_core::FillStatus for ReadOnlyLedger {
    fn is_consumed(&self, hash: &OrderHash) -> bool {
        self.0.is_consumed(hash)
    }
}

impl FillLedger for ReadOnlyLedger {
    fn consume(&mut self, _entry: LedgerEntry) -> itemswap_types::Result<()> {
        Err(SwapError::Ledger("read-only".to_string()))
    }

    fn entry(&self, hash: &OrderHash) -> Option<LedgerEntry> {
        self.0.entry(hash)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn consumed_hashes(&self) -> Vec<OrderHash> {
        self.0.consumed_hashes()
    }
}

#[test]
fn failed_commit_rolls_back_every_leg() {
    let mut ex = Exchange::with_ledger(ReadOnlyLedger::default());
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);
    ex.stock(maker.address());
    ex.fund(user, VU_AMOUNT);

    let order = sell_items(maker.address(), user);
    let sig = ex.sign(&maker, &order);
    let err = ex.executor.fill(&order, &sig, user).unwrap_err();
    assert!(matches!(err, SwapError::Ledger(_)), "Got: {err:?}");

    assert_eq!(ex.owner_of(1), Some(maker.address()));
    assert_eq!(ex.owner_of(2), Some(maker.address()));
    assert_eq!(ex.vu_balance(user), U256::from(VU_AMOUNT));
}

#[test]
fn insufficient_allowance_moves_nothing() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);
    ex.stock(maker.address());
    ex.fund(user, VU_AMOUNT);
    ex.vu.write(|l| l.approve(user, EXCHANGE, U256::from(VU_AMOUNT - 1)));

    let order = sell_items(maker.address(), user);
    let sig = ex.sign(&maker, &order);
    assert_eq!(
        ex.executor.simulate_fill(&order, &sig, user).unwrap_err().to_string(),
        ex.executor.fill(&order, &sig, user).unwrap_err().to_string()
    );
    assert_eq!(ex.owner_of(1), Some(maker.address()));
    assert!(ex.executor.ledger().is_empty());
}

// =========================================================================
// Durability
// =========================================================================

#[test]
fn journal_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fills.jsonl");
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);
    let order = sell_items(maker.address(), user);

    let (hash, digest, sig) = {
        let mut ex = Exchange::with_ledger(JournalFillLedger::open(&path).unwrap());
        ex.stock(maker.address());
        ex.fund(user, VU_AMOUNT);
        let sig = ex.sign(&maker, &order);
        let outcome = ex.executor.fill_with_receipt(&order, &sig, user).unwrap();
        (outcome.hash(), ex.executor.ledger().digest(), sig)
    };

    // Fresh collaborators, same journal: the order stays consumed.
    let mut ex = Exchange::with_ledger(JournalFillLedger::open(&path).unwrap());
    ex.stock(maker.address());
    ex.fund(user, VU_AMOUNT);
    assert!(ex.executor.is_consumed(&hash));
    assert_eq!(ex.executor.ledger().digest(), digest);
    assert_eq!(
        ex.executor.fill(&order, &sig, user).unwrap(),
        SwapCode::InvalidFill
    );
}

#[test]
fn executor_from_config_opens_journal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SwapConfig::new(EXCHANGE, VU_TOKEN, ITEM_TOKEN);
    config.ledger.journal_path = Some(dir.path().join("fills.jsonl"));

    let mut assets = AssetRegistry::new();
    assets
        .register_fungible(VU_TOKEN, FungibleLedger::new("VU"))
        .unwrap();
    assets
        .register_item(ITEM_TOKEN, ItemLedger::new("VUI"))
        .unwrap();

    let executor = SwapExecutor::from_config(&config, assets).unwrap();
    assert!(matches!(executor.ledger(), ConfiguredLedger::Journal(_)));
    assert_eq!(executor.exchange(), EXCHANGE);
}

// =========================================================================
// Concurrency
// =========================================================================

#[test]
fn concurrent_fills_settle_exactly_once() {
    let ex = Exchange::new();
    let maker = TestKey::new(1);
    let mut order = sell_items(maker.address(), Address::ZERO);
    order.taker = Taker::Open;
    ex.stock(maker.address());

    let takers: Vec<Address> = (0..8u8).map(|n| Address::repeat_byte(0x60 + n)).collect();
    for taker in &takers {
        ex.fund(*taker, VU_AMOUNT);
    }
    let sig = ex.sign(&maker, &order);
    let vu = ex.vu.clone();
    let shared = SerializedExecutor::new(ex.executor);
    let barrier = Arc::new(Barrier::new(takers.len()));

    let handles: Vec<_> = takers
        .iter()
        .map(|taker| {
            let shared = shared.clone();
            let barrier = Arc::clone(&barrier);
            let order = order.clone();
            let taker = *taker;
            thread::spawn(move || {
                barrier.wait();
                shared.fill(&order, &sig, taker).unwrap()
            })
        })
        .collect();

    let codes: Vec<SwapCode> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(codes.iter().filter(|c| c.is_ok()).count(), 1);
    assert!(codes
        .iter()
        .filter(|c| !c.is_ok())
        .all(|c| *c == SwapCode::InvalidFill));

    let paid: Vec<_> = takers
        .iter()
        .filter(|t| vu.read(|l| l.balance_of(**t)).is_zero())
        .collect();
    assert_eq!(paid.len(), 1);
    assert_eq!(vu.read(|l| l.balance_of(maker.address())), U256::from(VU_AMOUNT));
}

#[test]
fn settlement_record_serializes_for_audit() {
    let mut ex = Exchange::new();
    let maker = TestKey::new(1);
    let user = Address::repeat_byte(0x22);
    ex.stock(maker.address());
    ex.fund(user, VU_AMOUNT);

    let order = sell_items(maker.address(), user);
    let sig = ex.sign(&maker, &order);
    let outcome = ex.executor.fill_with_receipt(&order, &sig, user).unwrap();
    let settlement = outcome.settlement().unwrap();

    let json = serde_json::to_value(settlement).unwrap();
    assert_eq!(json["kind"], "fill");
    assert_eq!(json["transfers"], 3);
    let back: Settlement = serde_json::from_value(json).unwrap();
    assert_eq!(&back, settlement);
}
