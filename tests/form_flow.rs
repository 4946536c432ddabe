//! End-to-end flow: block list edits, serialization, typed decode.

use pretty_assertions::assert_eq;
use serde_json::json;
use tickform::config::PanelConfig;
use tickform::form::{self, FormEntry};
use tickform::visibility::FieldVisibility;
use tickform::{BlockList, Phase};

fn seeded_list() -> BlockList {
    BlockList::new(vec![
        FormEntry::new("ticker-symbol", "SPY"),
        FormEntry::new("ticker-symbol_type", "stock"),
        FormEntry::new("ticker-layout-y_axis", "on"),
    ])
}

#[test]
fn test_block_edits_flow_into_serialized_form() {
    let mut list = seeded_list();

    // The user adds a second ticker and retargets it at crypto.
    let second = list.add();
    if let Some(block) = list.get_mut(second) {
        block.set_field("ticker-symbol", "BTC-USD");
        block.set_field("ticker-symbol_type", "crypto");
    }
    assert!(list.finish_enter(second));

    // The pre/post field is only shown for the stock block.
    let visibility = FieldVisibility::default();
    let shown: Vec<bool> = list
        .blocks()
        .iter()
        .filter_map(|block| {
            block
                .fields()
                .iter()
                .find(|field| field.name == "ticker-symbol_type")
        })
        .map(|field| visibility.evaluate(&field.value))
        .collect();
    assert_eq!(shown, vec![true, false]);

    let mut entries = list.entries();
    entries.push(FormEntry::new("sequence-skip_outdated", "1"));
    entries.push(FormEntry::new("api_key", "abc123"));

    let serialized = form::serialize(&entries);
    assert_eq!(
        serde_json::to_value(&serialized).ok(),
        Some(json!({
            "tickers": [
                {"symbol": "SPY", "symbol_type": "stock", "layout": {"y_axis": true}},
                {"symbol": "BTC-USD", "symbol_type": "crypto", "layout": {"y_axis": true}},
            ],
            "sequence": {"skip_outdated": true},
            "api_key": "abc123",
        }))
    );

    let config = PanelConfig::from_form(&serialized).ok();
    let symbols: Option<Vec<&str>> = config
        .as_ref()
        .map(|c| c.tickers.iter().map(|t| t.symbol.as_str()).collect());
    assert_eq!(symbols, Some(vec!["SPY", "BTC-USD"]));
    assert_eq!(
        config.as_ref().and_then(|c| c.api_key.as_deref()),
        Some("abc123")
    );
    // Untouched by the form, so the model defaults apply.
    assert_eq!(config.as_ref().map(|c| c.sequence.skip_empty), Some(true));
}

#[test]
fn test_exiting_block_serializes_until_completion() {
    let mut list = seeded_list();
    let second = list.add();
    if let Some(block) = list.get_mut(second) {
        block.set_field("ticker-symbol", "AAPL");
    }

    // Removal begins, but the fields stay live until the transition ends.
    assert!(list.begin_exit(second));
    let serialized = form::serialize(&list.entries());
    assert_eq!(serialized.tickers.len(), 2);

    assert!(list.finalize_exit(second));
    let serialized = form::serialize(&list.entries());
    assert_eq!(serialized.tickers.len(), 1);
    assert_eq!(serialized.tickers[0].get("symbol"), Some(&json!("SPY")));
}

#[test]
fn test_add_then_remove_immediately() {
    let mut list = seeded_list();
    let id = list.add();
    // Removal before the entry transition finished: exit supersedes entry.
    assert!(list.begin_exit(id));
    assert_eq!(list.get(id).map(|block| block.phase()), Some(Phase::Exiting));
    assert!(!list.finish_enter(id));
    assert!(list.finalize_exit(id));
    assert_eq!(list.len(), 1);
}

#[test]
fn test_sole_block_survives_removal_attempts() {
    let mut list = seeded_list();
    let Some(id) = list.blocks().first().map(tickform::Block::id) else {
        unreachable!("list is never empty");
    };
    assert!(!list.begin_exit(id));
    assert!(!list.finalize_exit(id));
    assert_eq!(list.len(), 1);

    let serialized = form::serialize(&list.entries());
    assert_eq!(serialized.tickers.len(), 1);
}
