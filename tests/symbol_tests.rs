//! Symbol Slicer and Soft Decision Tests
//!
//! These tests run on the host with std feature enabled.
//! Run with: cargo test --no-default-features --features std

use m17_tnc::demod::symbol::{phase_estimate, SymbolDecoder};
use m17_tnc::types::{SoftDibit, Symbol};

// =============================================================================
// Symbol Type Tests
// =============================================================================

#[test]
fn test_dibit_mapping_roundtrip() {
    for symbol in [
        Symbol::PlusOne,
        Symbol::PlusThree,
        Symbol::MinusOne,
        Symbol::MinusThree,
    ] {
        assert_eq!(Symbol::from_dibit(symbol.dibit()), symbol);
    }
}

#[test]
fn test_dibit_values_follow_the_air_mapping() {
    assert_eq!(Symbol::PlusOne.dibit(), 0b00);
    assert_eq!(Symbol::PlusThree.dibit(), 0b01);
    assert_eq!(Symbol::MinusOne.dibit(), 0b10);
    assert_eq!(Symbol::MinusThree.dibit(), 0b11);
}

#[test]
fn test_symbol_levels() {
    assert_eq!(Symbol::PlusOne.level(), 1.0);
    assert_eq!(Symbol::PlusThree.level(), 3.0);
    assert_eq!(Symbol::MinusOne.level(), -1.0);
    assert_eq!(Symbol::MinusThree.level(), -3.0);
}

#[test]
fn test_outer_classification() {
    assert!(Symbol::PlusThree.is_outer());
    assert!(Symbol::MinusThree.is_outer());
    assert!(!Symbol::PlusOne.is_outer());
    assert!(!Symbol::MinusOne.is_outer());
}

#[test]
fn test_soft_dibit_hard_decision() {
    assert_eq!(SoftDibit::new(-96, 32).hard(), 0b01);
    assert_eq!(SoftDibit::new(-32, -32).hard(), 0b00);
    assert_eq!(SoftDibit::new(32, -32).hard(), 0b10);
    assert_eq!(SoftDibit::new(96, 32).hard(), 0b11);
}

// =============================================================================
// Phase Estimate Tests
// =============================================================================

#[test]
fn test_phase_estimate_is_the_window_slope() {
    // Rise of 2 over two tenth-symbol steps
    let slope = phase_estimate(&[1.0, 2.0, 3.0]);
    assert!((slope - 10.0).abs() < 1e-4, "Slope mismatch: {}", slope);
}

#[test]
fn test_phase_estimate_flat_window() {
    let slope = phase_estimate(&[2.0, 2.0, 2.0]);
    assert!(slope.abs() < 1e-6);
}

#[test]
fn test_phase_estimate_falling_window() {
    let slope = phase_estimate(&[3.0, 2.0, 1.0]);
    assert!((slope + 10.0).abs() < 1e-4);
}

// =============================================================================
// Slicer Tests
// =============================================================================

#[test]
fn test_clean_levels_decide_their_symbols() {
    let mut decoder = SymbolDecoder::new();
    let cases = [
        (3.0, Symbol::PlusThree),
        (1.0, Symbol::PlusOne),
        (-1.0, Symbol::MinusOne),
        (-3.0, Symbol::MinusThree),
    ];
    for (center, expected) in cases {
        let (symbol, _) = decoder.decide(center);
        assert_eq!(symbol, expected, "Wrong decision for {}", center);
    }
}

#[test]
fn test_decision_boundaries() {
    let mut decoder = SymbolDecoder::new();
    assert_eq!(decoder.decide(2.0).0, Symbol::PlusThree);
    assert_eq!(decoder.decide(1.99).0, Symbol::PlusOne);
    assert_eq!(decoder.decide(0.0).0, Symbol::PlusOne);
    assert_eq!(decoder.decide(-0.01).0, Symbol::MinusOne);
    assert_eq!(decoder.decide(-1.99).0, Symbol::MinusOne);
    assert_eq!(decoder.decide(-2.01).0, Symbol::MinusThree);
}

#[test]
fn test_soft_bits_match_hard_decisions_on_clean_levels() {
    let mut decoder = SymbolDecoder::new();
    for center in [3.0, 1.0, -1.0, -3.0] {
        let (symbol, soft) = decoder.decide(center);
        assert_eq!(
            soft.hard(),
            symbol.dibit(),
            "Soft signs disagree with the slicer at {}",
            center
        );
    }
}

#[test]
fn test_soft_bit_confidence_scales_with_distance() {
    let mut decoder = SymbolDecoder::new();
    let (_, at_one) = decoder.decide(1.0);
    let (_, at_three) = decoder.decide(3.0);

    // The sign bit is three times as confident at the outer level
    assert_eq!(at_one.first, -32);
    assert_eq!(at_three.first, -96);

    // The magnitude bit sits one level from the boundary in each case
    assert_eq!(at_one.second, -32);
    assert_eq!(at_three.second, 32);
}

#[test]
fn test_soft_bits_saturate() {
    let mut decoder = SymbolDecoder::new();
    let (_, soft) = decoder.decide(10.0);
    assert_eq!(soft.first, i8::MIN);
    assert_eq!(soft.second, i8::MAX);

    let (_, soft) = decoder.decide(-10.0);
    assert_eq!(soft.first, i8::MAX);
    assert_eq!(soft.second, i8::MAX);
}

// =============================================================================
// Error Vector Tests
// =============================================================================

#[test]
fn test_evm_measures_distance_from_the_decided_level() {
    let mut decoder = SymbolDecoder::new();
    decoder.decide(1.2);
    assert!(
        (decoder.evm() - 0.2).abs() < 1e-6,
        "Inner EVM should be the raw distance: {}",
        decoder.evm()
    );
}

#[test]
fn test_outer_evm_is_normalized() {
    let mut decoder = SymbolDecoder::new();
    decoder.decide(3.3);
    assert!(
        (decoder.evm() - 0.1).abs() < 1e-6,
        "Outer EVM should divide by the outer level: {}",
        decoder.evm()
    );
}

#[test]
fn test_clean_symbols_have_zero_evm() {
    let mut decoder = SymbolDecoder::new();
    for center in [3.0, 1.0, -1.0, -3.0] {
        decoder.decide(center);
        assert!(decoder.evm().abs() < 1e-6, "Nonzero EVM at {}", center);
    }
}

#[test]
fn test_evm_average_converges() {
    let mut decoder = SymbolDecoder::new();
    for _ in 0..400 {
        decoder.decide(3.3);
    }
    assert!(
        (decoder.evm_average() - 0.1).abs() < 0.01,
        "Smoothed EVM should converge to 0.1: {}",
        decoder.evm_average()
    );
}

#[test]
fn test_reset_clears_the_metrics() {
    let mut decoder = SymbolDecoder::new();
    for _ in 0..100 {
        decoder.decide(1.5);
    }
    decoder.reset();
    assert!(decoder.evm().abs() < 1e-6);
    assert!(decoder.evm_average().abs() < 1e-6);
}
