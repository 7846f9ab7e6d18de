//! Normalization Primitives
//!
//! Pure numeric curves that turn one raw metric into a 0-100 sub-risk
//! (0 = safest, 100 = most risky). Each function takes literal inputs
//! plus its calibration thresholds, holds no state and performs no I/O,
//! so every curve is unit-testable in isolation.

/// Clamp a computed sub-risk into the valid scoring range
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Holder concentration risk from the top-10 holder percentage.
///
/// Monotonically increasing, saturating as concentration approaches
/// 100%. Tiered-linear rather than a single power curve so the low
/// range stays genuinely low-risk.
pub fn concentration_risk(top10_pct: f64) -> f64 {
    let pct = top10_pct.clamp(0.0, 100.0);
    let risk = if pct <= 20.0 {
        pct * 0.5
    } else if pct <= 50.0 {
        10.0 + (pct - 20.0) * 1.3
    } else if pct <= 80.0 {
        49.0 + (pct - 50.0) * 1.3
    } else {
        88.0 + (pct - 80.0) * 0.6
    };
    clamp_score(risk)
}

/// Liquidity depth risk from the liquidity-to-market-cap ratio.
///
/// An absolute floor kicks in below `min_liquidity_usd` regardless of
/// ratio: a $3k pool on a $5k market cap has a flattering ratio and is
/// still effectively untradeable.
pub fn liquidity_risk(liquidity_usd: f64, market_cap: f64, min_liquidity_usd: f64) -> f64 {
    let ratio = if market_cap > 0.0 {
        liquidity_usd / market_cap
    } else {
        0.0
    };

    let ratio_risk: f64 = if ratio >= 0.5 {
        5.0
    } else if ratio >= 0.2 {
        12.0
    } else if ratio >= 0.1 {
        25.0
    } else if ratio >= 0.05 {
        45.0
    } else if ratio >= 0.01 {
        70.0
    } else {
        90.0
    };

    // Absolute liquidity floor overrides a misleading ratio
    let floored = if liquidity_usd < min_liquidity_usd / 10.0 {
        ratio_risk.max(95.0)
    } else if liquidity_usd < min_liquidity_usd {
        ratio_risk.max(85.0)
    } else {
        ratio_risk
    };

    clamp_score(floored)
}

/// Market-cap scale discount: a single multiplier applied to several
/// factor scores for large-cap tokens.
///
/// Implemented as one tier lookup so applying it twice is a bug that
/// shows up immediately in tests, not a silent compounding discount.
pub fn market_cap_discount(market_cap: f64) -> f64 {
    if market_cap >= 50_000_000_000.0 {
        0.3
    } else if market_cap >= 10_000_000_000.0 {
        0.5
    } else if market_cap >= 1_000_000_000.0 {
        0.7
    } else if market_cap >= 100_000_000.0 {
        0.85
    } else {
        1.0
    }
}

/// Supply dilution risk from FDV/market-cap divergence and the
/// max-supply overhang relative to circulating supply.
pub fn supply_dilution_risk(
    fdv: Option<f64>,
    market_cap: Option<f64>,
    max_supply: Option<f64>,
    circulating_supply: Option<f64>,
) -> Option<f64> {
    let dilution_risk = match (fdv, market_cap) {
        (Some(f), Some(m)) if m > 0.0 => {
            let ratio = f / m;
            Some(if ratio <= 1.1 {
                5.0
            } else if ratio <= 1.5 {
                20.0
            } else if ratio <= 3.0 {
                45.0
            } else if ratio <= 10.0 {
                70.0
            } else {
                90.0
            })
        }
        _ => None,
    };

    let overhang_risk = match (max_supply, circulating_supply) {
        (Some(max), Some(circ)) if circ > 0.0 && max > 0.0 => {
            let ratio = max / circ;
            Some(if ratio <= 1.05 {
                5.0
            } else if ratio <= 1.5 {
                20.0
            } else if ratio <= 3.0 {
                45.0
            } else if ratio <= 10.0 {
                70.0
            } else {
                90.0
            })
        }
        _ => None,
    };

    match (dilution_risk, overhang_risk) {
        (Some(a), Some(b)) => Some(clamp_score((a + b) / 2.0)),
        (Some(a), None) => Some(clamp_score(a)),
        (None, Some(b)) => Some(clamp_score(b)),
        (None, None) => None,
    }
}

/// Burn/deflation risk: higher burn ratio lowers risk, bounded so a
/// huge burn never reads as "risk free" on its own.
pub fn burn_deflation_risk(burned_supply: f64, total_supply: f64) -> f64 {
    if total_supply <= 0.0 {
        return 50.0;
    }
    let ratio = (burned_supply / total_supply).clamp(0.0, 1.0);
    let risk = if ratio >= 0.5 {
        10.0
    } else if ratio >= 0.2 {
        25.0
    } else if ratio >= 0.05 {
        35.0
    } else if ratio >= 0.01 {
        45.0
    } else {
        50.0
    };
    clamp_score(risk)
}

/// Token age risk: steep penalty under `young_days`, diminishing
/// returns beyond `mature_days`.
pub fn age_risk(age_days: f64, young_days: f64, mature_days: f64) -> f64 {
    let risk = if age_days < 1.0 {
        100.0
    } else if age_days < young_days {
        // 95 down to 75 across the young window
        95.0 - (age_days / young_days) * 20.0
    } else if age_days < 30.0 {
        75.0 - ((age_days - young_days) / (30.0 - young_days)) * 25.0
    } else if age_days < 90.0 {
        50.0 - ((age_days - 30.0) / 60.0) * 15.0
    } else if age_days < mature_days {
        35.0 - ((age_days - 90.0) / (mature_days - 90.0)) * 20.0
    } else {
        // Past maturity the effect keeps shrinking but never hits zero
        (15.0 * mature_days / age_days).max(5.0)
    };
    clamp_score(risk)
}

/// Market activity risk from 24h transaction count and volume turnover.
///
/// Near-zero activity against a nonzero market cap reads as wash-traded
/// or abandoned, not as calm.
pub fn activity_risk(tx_count_24h: u64, volume_24h_usd: f64, market_cap: f64) -> f64 {
    if market_cap > 0.0 && (tx_count_24h == 0 || volume_24h_usd < 1.0) {
        return 90.0;
    }

    let turnover = if market_cap > 0.0 {
        volume_24h_usd / market_cap
    } else {
        0.0
    };

    let turnover_risk = if turnover >= 0.05 {
        10.0
    } else if turnover >= 0.01 {
        25.0
    } else if turnover >= 0.001 {
        45.0
    } else {
        70.0
    };

    let tx_risk = if tx_count_24h >= 1_000 {
        10.0
    } else if tx_count_24h >= 100 {
        25.0
    } else if tx_count_24h >= 10 {
        50.0
    } else {
        80.0
    };

    clamp_score((turnover_risk + tx_risk) / 2.0)
}
