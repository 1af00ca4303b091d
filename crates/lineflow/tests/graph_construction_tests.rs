//! Integration tests for the graph construction protocol.
//!
//! These tests exercise owner discovery, clock selection, warm-up
//! propagation, registration ordering, and the clock-as-child feedback
//! case through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use lineflow::prelude::*;

/// Records every lifecycle dispatch into a shared event log.
struct Recorder {
    label: &'static str,
    events: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    fn logic(
        label: &'static str,
        events: &Rc<RefCell<Vec<String>>>,
    ) -> Box<dyn NodeLogic<f64>> {
        Box::new(Self {
            label,
            events: events.clone(),
        })
    }

    fn record(&self, what: &str) {
        self.events.borrow_mut().push(format!("{}:{}", self.label, what));
    }
}

impl NodeLogic<f64> for Recorder {
    fn prenext(&mut self, _: &mut NodeView<'_, f64>) -> Result<()> {
        self.record("prenext");
        Ok(())
    }
    fn next(&mut self, _: &mut NodeView<'_, f64>) -> Result<()> {
        self.record("next");
        Ok(())
    }
    fn once(&mut self, _: &mut NodeView<'_, f64>, _: usize, _: usize) -> Result<()> {
        self.record("once");
        Ok(())
    }
}

struct Noop;
impl NodeLogic<f64> for Noop {}

#[test]
fn test_nested_construction_registers_bottom_up() {
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();

    let mut fast_id = None;
    let mut slow_id = None;
    let strategy = graph
        .build_node(NodeDecl::indicator(["signal"]), &[close], |b| {
            let data = b.data(0).unwrap();
            fast_id = Some(Sma::build(b.graph(), data, 3)?);
            slow_id = Some(Sma::build(b.graph(), data, 10)?);
            Ok(Box::new(Noop))
        })
        .unwrap();
    let fast = fast_id.unwrap();
    let slow = slow_id.unwrap();

    // Children registered in construction order, fully formed first.
    assert_eq!(graph.children(strategy), &[fast, slow]);
    assert_eq!(graph.owner(fast), Some(strategy));
    assert_eq!(graph.owner(slow), Some(strategy));
    // The slowest child dictates the strategy's warm-up.
    assert_eq!(graph.min_period(strategy), 10);
}

#[test]
fn test_ordering_children_self_observer() {
    let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();

    let ev = events.clone();
    let root = graph
        .build_node(NodeDecl::indicator(["out"]), &[close], |b| {
            let data = b.data(0).unwrap();
            let c1_logic = Recorder::logic("c1", &ev);
            b.graph()
                .build_node(NodeDecl::indicator(["c1"]), &[data], move |_| Ok(c1_logic))?;
            let c2_logic = Recorder::logic("c2", &ev);
            b.graph()
                .build_node(NodeDecl::indicator(["c2"]), &[data], move |_| Ok(c2_logic))?;
            let o_logic = Recorder::logic("o", &ev);
            b.graph()
                .build_node(NodeDecl::observer(["o"]), &[], move |_| Ok(o_logic))?;
            Ok(Recorder::logic("root", &ev))
        })
        .unwrap();

    graph.push_record(close, &[1.0]).unwrap();
    graph.advance_one(root).unwrap();

    // One bar: c1 fully, then c2 fully, then the node's own dispatch, then
    // the observer, with no interleaving.
    assert_eq!(
        events.borrow().as_slice(),
        &["c1:next", "c2:next", "root:next", "o:next"]
    );
}

#[test]
fn test_batch_ordering_children_before_self() {
    let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();

    let ev = events.clone();
    let root = graph
        .build_node(NodeDecl::indicator(["out"]), &[close], |b| {
            let data = b.data(0).unwrap();
            let child_logic = Recorder::logic("child", &ev);
            b.graph()
                .build_node(NodeDecl::indicator(["c"]), &[data], move |_| Ok(child_logic))?;
            Ok(Recorder::logic("root", &ev))
        })
        .unwrap();

    for v in [1.0, 2.0] {
        graph.push_record(close, &[v]).unwrap();
    }
    graph.compute_all(root).unwrap();

    assert_eq!(events.borrow().as_slice(), &["child:once", "root:once"]);
}

#[test]
fn test_clock_as_child_advances_exactly_once_per_step() {
    let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();

    let clock_logic = Recorder::logic("clock", &events);
    let clock_node = graph
        .build_node(NodeDecl::indicator(["c"]), &[close], move |_| Ok(clock_logic))
        .unwrap();
    let root_logic = Recorder::logic("root", &events);
    let root = graph
        .build_node(NodeDecl::indicator(["n"]), &[clock_node], move |_| {
            Ok(root_logic)
        })
        .unwrap();

    // Feedback: the node declares its own clock as a dependency.
    graph.add_child(root, clock_node);
    assert!(graph.clock_is_child(root));
    assert!(graph.children(root).is_empty());

    for v in [1.0, 2.0, 3.0] {
        graph.push_record(close, &[v]).unwrap();
        graph.advance_one(root).unwrap();
    }

    // Each bar: the clock advances exactly once, before the node.
    let log = events.borrow();
    let clock_dispatches = log.iter().filter(|e| e.starts_with("clock:")).count();
    assert_eq!(clock_dispatches, 3);
    assert_eq!(
        log.as_slice(),
        &[
            "clock:next",
            "root:next",
            "clock:next",
            "root:next",
            "clock:next",
            "root:next"
        ]
    );
    assert_eq!(graph.series(clock_node).len(), 3);
    assert_eq!(graph.series(root).len(), 3);
}

#[test]
fn test_clock_as_child_batch_computes_clock_first() {
    let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();

    let clock_logic = Recorder::logic("clock", &events);
    let clock_node = graph
        .build_node(NodeDecl::indicator(["c"]), &[close], move |_| Ok(clock_logic))
        .unwrap();
    let root_logic = Recorder::logic("root", &events);
    let root = graph
        .build_node(NodeDecl::indicator(["n"]), &[clock_node], move |_| {
            Ok(root_logic)
        })
        .unwrap();
    graph.add_child(root, clock_node);

    for v in [1.0, 2.0] {
        graph.push_record(close, &[v]).unwrap();
    }
    graph.compute_all(root).unwrap();

    assert_eq!(events.borrow().as_slice(), &["clock:once", "root:once"]);
}

#[test]
fn test_min_period_monotonic_over_children_and_datas() {
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();
    let slow = Sma::build(&mut graph, close, 8).unwrap();

    let strategy = graph
        .build_node(NodeDecl::indicator(["out"]), &[close, slow], |b| {
            let data = b.data(0).unwrap();
            Sma::build(b.graph(), data, 5)?;
            Ok(Box::new(Noop))
        })
        .unwrap();

    let over_children = graph
        .children(strategy)
        .iter()
        .map(|c| graph.min_period(*c))
        .max()
        .unwrap_or(1);
    let over_datas = graph
        .datas(strategy)
        .iter()
        .map(|d| graph.min_period(*d))
        .max()
        .unwrap_or(1);

    assert!(graph.min_period(strategy) >= over_children);
    assert!(graph.min_period(strategy) >= over_datas);
    assert_eq!(graph.min_period(strategy), 8);
}

#[test]
fn test_stream_arguments_are_not_parameters() {
    // Plain parameters (the period) configure the logic; stream arguments
    // become datas. Verify the partition by shape: one data, no extra
    // lines beyond the declaration.
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();
    let sma = Sma::build(&mut graph, close, 4).unwrap();
    assert_eq!(graph.datas(sma), &[close]);
    assert_eq!(graph.series(sma).arity(), 1);
    assert_eq!(graph.series(sma).name(0), Some("sma"));
}

#[test]
fn test_top_level_node_has_no_owner() {
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();
    let sma = Sma::build(&mut graph, close, 2).unwrap();
    assert!(graph.owner(sma).is_none());
}

#[test]
fn test_raised_min_period_returns_node_to_warmup() {
    let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let mut graph: Graph<f64> = Graph::new();
    let close = graph.add_stream(["close"]).unwrap();
    let logic = Recorder::logic("n", &events);
    let node = graph
        .build_node(NodeDecl::indicator(["out"]), &[close], move |_| Ok(logic))
        .unwrap();

    for v in [1.0, 2.0, 3.0] {
        graph.push_record(close, &[v]).unwrap();
        graph.advance_one(node).unwrap();
    }
    assert_eq!(events.borrow().len(), 3);

    // Raising the requirement mid-run puts later bars back into warm-up.
    graph.raise_min_period(node, 10).unwrap();
    graph.push_record(close, &[4.0]).unwrap();
    graph.advance_one(node).unwrap();
    assert_eq!(graph.min_period(node), 10);
    assert_eq!(events.borrow().last().unwrap(), "n:prenext");
}
