use tradesim_fifo::engine::{simulate, SimulationError, SimulationParams, Snapshot, Transition};
use tradesim_fifo::{Advisory, Decimal, Signal, SignalRecord};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn params(fee: &str) -> SimulationParams {
    SimulationParams {
        cash_base: d("100000"),
        limit: d("1000"),
        fee: d(fee),
    }
}

fn signal(bar: &str, close_px: &str, trade_px: &str, target: i64) -> Signal {
    Signal {
        bar: bar.to_string(),
        close_px: d(close_px),
        trade_px: d(trade_px),
        target,
    }
}

/// Signal traded and marked at the same price.
fn at(bar: &str, px: &str, target: i64) -> Signal {
    signal(bar, px, px, target)
}

fn assert_close(actual: Decimal, expected: Decimal) {
    let scale = expected.abs().max(Decimal::from(1i64));
    let tolerance = d("0.000000001") * scale;
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}

fn run(fee: &str, signals: &[Signal]) -> Vec<Snapshot> {
    simulate(params(fee), signals).unwrap().snapshots
}

#[test]
fn test_bootstrap_short_entry() {
    let snapshots = run("0.01", &[at("b0", "50", -10)]);
    let first = &snapshots[0];

    assert_eq!(first.short.position.entered, 10);
    assert_eq!(first.short.position.ending, 10);
    assert_eq!(first.long.position.ending, 0);
    assert_eq!(first.short.queue.len(), 10);
    assert!(first.long.queue.is_empty());

    let per_lot = -(d("1000") / d("49.99"));
    for lot in first.short.queue.iter() {
        assert_close(lot.quantity, per_lot);
        assert_eq!(lot.cost, d("49.99"));
        assert_eq!(lot.basis, d("-1000"));
    }
    assert_close(first.short.quantity.end, per_lot * Decimal::from(10i64));
    assert_eq!(first.short.basis.end, d("-10000"));

    assert_eq!(first.nav(), d("100000"));
    assert_eq!(first.risk.peak_nav, d("100000"));
    assert_eq!(first.cumulative_return, Decimal::zero());
    assert!(first.transition.is_none());
    assert!(!first.exit_blocked);
}

#[test]
fn test_flip_short_to_long() {
    let snapshots = run("0", &[at("b0", "50", -5), at("b1", "40", 3)]);
    let flip = &snapshots[1];

    assert_eq!(flip.transition, Some(Transition::ShortToLong));
    assert_eq!(flip.short.position.exited, 5);
    assert_eq!(flip.short.position.ending, 0);
    assert_eq!(flip.long.position.entered, 3);
    assert_eq!(flip.long.position.ending, 3);

    assert!(flip.short.queue.is_empty());
    assert_eq!(flip.short.quantity.end, Decimal::zero());
    assert_eq!(flip.short.basis.end, Decimal::zero());
    assert_eq!(flip.long.queue.len(), 3);
    assert_eq!(flip.long.quantity.end, d("75"));
    assert_eq!(flip.long.basis.end, d("3000"));

    // Shorted 100 units at 50, covered at 40.
    assert_eq!(flip.short.returns.realized, d("1000"));
    assert_eq!(flip.long.returns.realized, Decimal::zero());
    assert_eq!(flip.nav(), d("101000"));
    assert_eq!(flip.risk.entries, 1);
    assert_eq!(flip.risk.exits, 1);
}

#[test]
fn test_first_bar_entry_is_not_counted() {
    let snapshots = run("0", &[at("b0", "10", 2), at("b1", "10", 2), at("b2", "10", 3)]);
    assert_eq!(snapshots[0].risk.entries, 0);
    assert_eq!(snapshots[1].risk.entries, 0);
    assert_eq!(snapshots[2].risk.entries, 1);
}

#[test]
fn test_unrepresentable_target_fails_the_run() {
    let err = simulate(params("0"), &[at("b0", "10", 0), at("b1", "10", i64::MAX)]).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::UnrepresentableSize { ref bar, .. } if bar == "b1"
    ));
}

#[test]
fn test_flip_long_to_short() {
    let snapshots = run("0", &[at("b0", "20", 2), at("b1", "25", -1)]);
    let flip = &snapshots[1];

    assert_eq!(flip.transition, Some(Transition::LongToShort));
    assert_eq!(flip.long.position.exited, 2);
    assert_eq!(flip.short.position.entered, 1);
    assert_eq!(flip.long.returns.realized, d("500"));
    assert_eq!(flip.short.quantity.end, d("-40"));
    assert_eq!(flip.nav(), d("100500"));
}

#[test]
fn test_fifo_closes_oldest_lots_first() {
    let snapshots = run(
        "0",
        &[
            at("b0", "10", 0),
            at("b1", "10", 0),
            at("b2", "10", 1),
            at("b3", "20", 2),
            at("b4", "25", 3),
            at("b5", "25", 1),
        ],
    );

    let grown = &snapshots[4];
    let costs: Vec<Decimal> = grown.long.queue.iter().map(|lot| lot.cost).collect();
    assert_eq!(costs, vec![d("10"), d("20"), d("25")]);

    let last = &snapshots[5];
    assert_eq!(last.transition, Some(Transition::LongDeclines));
    assert_eq!(last.long.position.exited, 2);
    assert_eq!(last.long.queue.len(), 1);
    let remaining: Vec<Decimal> = last.long.queue.iter().map(|lot| lot.cost).collect();
    assert_eq!(remaining, vec![d("25")]);

    // Lots bought at 10 and 20 are sold at 25.
    assert_eq!(last.long.returns.realized, d("1750"));
    assert_eq!(last.long.returns.unrealized, Decimal::zero());
    assert_eq!(last.nav(), d("101750"));
}

#[test]
fn test_round_trip_at_constant_price() {
    let snapshots = run(
        "0",
        &[at("b0", "100", 0), at("b1", "100", 2), at("b2", "100", 0)],
    );
    let last = &snapshots[2];

    assert_eq!(last.transition, Some(Transition::LongToZero));
    assert_eq!(last.cumulative_return, Decimal::zero());
    assert_eq!(last.nav(), d("100000"));
    assert!(last.long.queue.is_empty());
    assert!(last.short.queue.is_empty());
    assert_eq!(last.risk.entries, 1);
    assert_eq!(last.risk.exits, 1);
}

#[test]
fn test_fee_costs_a_round_trip() {
    let snapshots = run(
        "0.5",
        &[at("b0", "100", 0), at("b1", "100", 1), at("b2", "100", 0)],
    );
    let last = &snapshots[2];

    // 1000 / 100.5 units bought at 100.5 and sold at 99.5.
    let units = d("1000") / d("100.5");
    assert_close(last.long.returns.realized, units * d("99.5") - d("1000"));
    assert!(last.nav() < d("100000"));
}

#[test]
fn test_drawdown_noise_floor() {
    let snapshots = run(
        "0",
        &[
            signal("b0", "100", "100", 1),
            signal("b1", "100.5", "100", 1),
            signal("b2", "100", "100", 1),
            signal("b3", "98", "100", 1),
            signal("b4", "100.5", "100", 1),
        ],
    );

    assert_eq!(snapshots[1].nav(), d("100005"));
    assert_eq!(snapshots[1].risk.peak_nav, d("100005"));

    // 5 below peak is 0.00005 of the cash base: suppressed.
    assert_eq!(snapshots[2].nav(), d("100000"));
    assert_eq!(snapshots[2].risk.drawdown, Decimal::zero());

    assert_eq!(snapshots[3].risk.drawdown, d("0.00025"));
    assert_eq!(snapshots[3].risk.worst_drawdown, d("0.00025"));

    assert_eq!(snapshots[4].risk.drawdown, Decimal::zero());
    assert_eq!(snapshots[4].risk.worst_drawdown, d("0.00025"));
}

#[test]
fn test_implausible_size_is_advisory() {
    let simulation = simulate(params("0"), &[at("b0", "10", 0), at("b1", "10", 10_000)]).unwrap();

    assert_eq!(simulation.snapshots.len(), 2);
    assert_eq!(simulation.snapshots[1].long.position.ending, 10_000);
    assert_eq!(
        simulation.advisories,
        vec![Advisory::ImplausibleSize {
            bar: "b1".to_string(),
            size: 10_000,
        }]
    );
}

#[test]
fn test_parsed_records_feed_simulation() {
    let records = [
        SignalRecord::new("2024-01-02", " 50 ", "50", " -2"),
        SignalRecord::new("2024-01-03", "45", "45", "0"),
    ];
    let signals: Vec<Signal> = records
        .iter()
        .map(|record| {
            let (signal, advisories) = Signal::parse(record);
            assert!(advisories.is_empty());
            signal
        })
        .collect();

    let snapshots = run("0", &signals);
    assert_eq!(snapshots[1].transition, Some(Transition::ShortToZero));
    assert_eq!(snapshots[1].short.returns.realized, d("200"));
}

#[test]
fn test_invariants_over_mixed_sequence() {
    let targets: [(&str, &str, i64); 14] = [
        ("60", "60.2", -3),
        ("58", "58.1", -5),
        ("57", "57.3", -2),
        ("59", "58.9", 4),
        ("61", "61.4", 6),
        ("64", "63.8", 1),
        ("62", "62.2", 0),
        ("63", "63.1", 0),
        ("60", "60.4", -1),
        ("55", "55.5", -4),
        ("56", "56.1", 0),
        ("58", "57.7", 3),
        ("52", "52.3", -6),
        ("53", "53.6", 2),
    ];
    let signals: Vec<Signal> = targets
        .iter()
        .enumerate()
        .map(|(i, (close, trade, target))| signal(&format!("b{}", i), close, trade, *target))
        .collect();

    let snapshots = run("0.01", &signals);
    assert_eq!(snapshots.len(), signals.len());

    let mut realized_total = Decimal::zero();
    let mut worst = Decimal::zero();
    for (i, s) in snapshots.iter().enumerate() {
        // One book at most is open.
        assert_eq!(s.short.position.ending * s.long.position.ending, 0);

        let (prev_short, prev_long) = match i {
            0 => (0, 0),
            _ => (
                snapshots[i - 1].short.position.ending,
                snapshots[i - 1].long.position.ending,
            ),
        };
        for (book, prev_ending) in [(&s.short, prev_short), (&s.long, prev_long)] {
            assert_eq!(book.queue.len(), book.position.ending);
            assert_eq!(book.queue.total_basis(), book.basis.end);
            assert_close(book.queue.total_quantity(), book.quantity.end);
            assert_eq!(
                book.position.ending + book.position.exited,
                prev_ending + book.position.entered
            );
        }

        assert_eq!(s.nav(), d("100000") + s.cumulative_return);
        assert!(s.risk.drawdown >= Decimal::zero());
        assert!(s.risk.drawdown <= s.risk.worst_drawdown);
        assert!(s.risk.worst_drawdown >= worst);
        worst = s.risk.worst_drawdown;

        realized_total += s.short.returns.realized + s.long.returns.realized;
    }

    // Cumulative return is everything realized plus what is still open.
    let last = &snapshots[snapshots.len() - 1];
    let open = last.short.returns.unrealized + last.long.returns.unrealized;
    assert_close(last.cumulative_return, realized_total + open);
}
