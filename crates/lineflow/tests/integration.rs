//! Integration tests for the public API.
//!
//! End-to-end scenarios driven through the prelude: the rolling-mean
//! warm-up scenario, the cross-node binding scenario, and full feed-driven
//! runs.

use lineflow::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Noop;
impl NodeLogic<f64> for Noop {}

#[test]
fn test_rolling_mean_scenario_step_mode() {
    init_tracing();
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();
    let mean = Sma::build(&mut graph, close, 3).unwrap();

    for value in [10.0, 11.0, 12.0, 13.0, 14.0] {
        graph.push_record(close, &[value]).unwrap();
        graph.advance_one(mean).unwrap();
    }

    let line = graph.series(mean).line(0).unwrap();
    // First two bars unresolved, then the 3-bar rolling mean.
    assert!(line.at(0).unwrap().is_nan());
    assert!(line.at(1).unwrap().is_nan());
    assert!(approx_eq(line.at(2).unwrap(), 11.0, EPSILON));
    assert!(approx_eq(line.at(3).unwrap(), 12.0, EPSILON));
    assert!(approx_eq(line.at(4).unwrap(), 13.0, EPSILON));
}

#[test]
fn test_rolling_mean_scenario_batch_mode() {
    init_tracing();
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();
    let mean = Sma::build(&mut graph, close, 3).unwrap();

    for value in [10.0, 11.0, 12.0, 13.0, 14.0] {
        graph.push_record(close, &[value]).unwrap();
    }
    graph.compute_all(mean).unwrap();

    let line = graph.series(mean).line(0).unwrap();
    for (index, expected) in [(2, 11.0), (3, 12.0), (4, 13.0)] {
        assert!(approx_eq(line.at(index).unwrap(), expected, EPSILON));
    }
    assert_eq!(count_nan_prefix(line.as_slice()), 2);
}

#[test]
fn test_binding_scenario_batch() {
    init_tracing();
    // Node A's output line 0 bound to node B's line 1: after one batch
    // pass, B's line 1 equals A's line 0 at every resolved index.
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();
    let a = Sma::build(&mut graph, close, 3).unwrap();
    let b = graph
        .build_node(NodeDecl::indicator(["own", "mirror"]), &[close], |_| {
            Ok(Box::new(Noop))
        })
        .unwrap();
    graph.bind_lines(a, &[0], b, &[1]).unwrap();

    for value in [10.0, 11.0, 12.0, 13.0, 14.0] {
        graph.push_record(close, &[value]).unwrap();
    }
    // B sizes itself first so the binding has a full-length target.
    graph.compute_all(b).unwrap();
    graph.compute_all(a).unwrap();

    let a_line = graph.series(a).line(0).unwrap();
    let b_line = graph.series(b).line(1).unwrap();
    assert_eq!(b_line.buflen(), 5);
    for i in 0..5 {
        let expected = a_line.at(i).unwrap();
        let got = b_line.at(i).unwrap();
        assert!((expected.is_nan() && got.is_nan()) || expected == got);
    }
}

#[test]
fn test_binding_out_of_arity_fails_at_bind_time() {
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();
    let a = Sma::build(&mut graph, close, 3).unwrap();
    let b = graph
        .build_node(NodeDecl::indicator(["own"]), &[close], |_| Ok(Box::new(Noop)))
        .unwrap();

    let err = graph.bind_lines(a, &[0], b, &[1]).unwrap_err();
    assert_eq!(err, Error::BindingRange { line: 1, arity: 1 });
}

#[test]
fn test_full_feed_run_with_observer() {
    init_tracing();
    let mut graph: Graph<f64> = Graph::new();
    let stream = graph.add_bar_stream().unwrap();

    let mut peak_id = None;
    let strategy = graph
        .build_node(NodeDecl::indicator(["signal"]), &[stream], |b| {
            let data = b.data(0).unwrap();
            let sma = Sma::build_on(b.graph(), data, CLOSE, 3)?;
            peak_id = Some(Peak::build_watching(b.graph(), Some(sma), 0)?);
            Ok(Box::new(Noop) as Box<dyn NodeLogic<f64>>)
        })
        .unwrap();
    let peak = peak_id.unwrap();

    let closes = [10.0, 12.0, 11.0, 15.0, 9.0, 13.0];
    let mut feed = MemoryFeed::from_closes(&closes).unwrap();
    let bars = run_step(&mut graph, &mut feed, stream, strategy).unwrap();
    assert_eq!(bars, 6);

    // The observer tracked the running maximum of the SMA line.
    let peak_line = graph.series(peak).line(0).unwrap();
    assert_eq!(peak_line.len(), 6);
    // SMA(3) over the closes: [_, _, 11, 12.667, 11.667, 12.333];
    // running max from bar 3 onward.
    assert!(approx_eq(peak_line.at(2).unwrap(), 11.0, EPSILON));
    assert!(approx_eq(peak_line.at(3).unwrap(), 38.0 / 3.0, EPSILON));
    assert!(approx_eq(peak_line.at(4).unwrap(), 38.0 / 3.0, EPSILON));
    assert!(approx_eq(peak_line.at(5).unwrap(), 38.0 / 3.0, EPSILON));
}

#[test]
fn test_prelude_provides_working_surface() {
    // A compile-level check that the prelude covers typical usage.
    let mut graph: Graph<f64> = Graph::new();
    let stream = graph.add_bar_stream().unwrap();
    let ema = Ema::build_on(&mut graph, stream, CLOSE, 4).unwrap();
    let topo = Topology::from_graph(&graph).unwrap();
    assert_eq!(topo.len(), 2);
    assert_eq!(graph.kind(stream), NodeKind::Stream);
    assert_eq!(graph.kind(ema), NodeKind::Indicator);
    assert_eq!(Phase::of(1, 4), Phase::Warmup);
}

#[test]
fn test_error_propagates_out_of_run() {
    // A logic bug (reading unavailable history) aborts the whole run.
    struct ReadsTooFar;
    impl NodeLogic<f64> for ReadsTooFar {
        fn next(&mut self, v: &mut NodeView<'_, f64>) -> Result<()> {
            v.input(0, 0, -100)?;
            Ok(())
        }
    }

    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();
    let node = graph
        .build_node(NodeDecl::indicator(["out"]), &[close], |_| {
            Ok(Box::new(ReadsTooFar))
        })
        .unwrap();

    graph.push_record(close, &[1.0]).unwrap();
    let err = graph.advance_one(node).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { .. }));
}
