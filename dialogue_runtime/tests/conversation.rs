use dialogue_graph::{
    BinaryOperation, CheckTree, DialogueGraph, Edge, GraphAsset, Guid, LineContext, NodeKind, Property,
    RawLine, RawNode,
};
use dialogue_runtime::{ActorData, Conversation, InstanceData, InstanceRegistry};
use pretty_assertions::assert_eq;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn line(node: &str, index: usize, message: &str) -> RawLine {
    RawLine::with_ports(
        message,
        format!("{node}.{index}.next"),
        format!("{node}.{index}.trig"),
        format!("{node}.{index}.check"),
    )
}

fn next(from: &str, index: usize, to: &str) -> Edge {
    Edge::new(from, format!("{from}.{index}.next"), to, format!("{to}.in"))
}

fn check(source: &str, node: &str, index: usize) -> Edge {
    Edge::new(source, format!("{source}.out"), node, format!("{node}.{index}.check"))
}

fn trigger(node: &str, index: usize, target: &str) -> Edge {
    Edge::new(node, format!("{node}.{index}.trig"), target, format!("{target}.in"))
}

fn counter(data: &mut InstanceData, property: &str) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let handle = Rc::clone(&count);
    data.register_trigger(property, move |_: &LineContext<'_>| handle.set(handle.get() + 1));
    count
}

/// One NPC node with a gated line and a fallback line, both ending the conversation.
fn gated_graph() -> DialogueGraph {
    let asset = GraphAsset::new("gated")
        .with_property(Property::check("Is friendly").with_guid("friendly"))
        .with_property(Property::check("Is rich").with_guid("rich"))
        .with_node(
            RawNode::npc("npc")
                .with_line(line("npc", 0, "Welcome, friend."))
                .with_line(line("npc", 1, "Move along.")),
        )
        .with_node(RawNode::property("friendly-node", "friendly"))
        .with_node(RawNode::property("rich-node", "rich"))
        .with_edge(check("friendly-node", "npc", 0))
        // the fallback carries its own check, which must be ignored
        .with_edge(check("rich-node", "npc", 1));
    DialogueGraph::from_asset(asset).unwrap()
}

#[test]
fn test_gated_line_selected_when_check_passes() {
    let graph = gated_graph();
    let mut data = InstanceData::new();
    data.register_check("friendly", |_: &LineContext<'_>| true);
    data.register_check("rich", |_: &LineContext<'_>| false);

    let mut conversation = Conversation::new(&graph);
    conversation.reset();
    assert_eq!(conversation.progress_npc(&mut data), Ok("Welcome, friend."));
    assert!(conversation.is_done());
}

#[test]
fn test_fallback_line_ignores_its_own_check() {
    let graph = gated_graph();
    for rich in [false, true] {
        let mut data = InstanceData::new();
        data.register_check("friendly", |_: &LineContext<'_>| false);
        data.register_check("rich", move |_: &LineContext<'_>| rich);

        let mut conversation = Conversation::new(&graph);
        conversation.reset();
        assert_eq!(conversation.progress_npc(&mut data), Ok("Move along."));
    }
}

#[test]
fn test_unregistered_check_reads_false() {
    let graph = gated_graph();
    let mut data = InstanceData::new();

    let mut conversation = Conversation::new(&graph);
    conversation.reset();
    assert_eq!(conversation.progress_npc(&mut data), Ok("Move along."));
}

#[test]
fn test_check_receives_node_and_line() {
    let graph = gated_graph();
    let mut data = InstanceData::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    data.register_check("friendly", move |ctx: &LineContext<'_>| {
        log.borrow_mut().push((ctx.node.to_string(), ctx.line_index));
        false
    });

    let mut conversation = Conversation::new(&graph);
    conversation.reset();
    conversation.progress_npc(&mut data).unwrap();

    assert_eq!(*seen.borrow(), vec![("npc".to_string(), 0)]);
}

#[test]
fn test_boolean_wiring_gates_line() {
    // line 0 passes when (a NAND b) holds
    let asset = GraphAsset::new("nand")
        .with_property(Property::check("A").with_guid("a"))
        .with_property(Property::check("B").with_guid("b"))
        .with_node(
            RawNode::npc("npc")
                .with_line(line("npc", 0, "gated"))
                .with_line(line("npc", 1, "fallback")),
        )
        .with_node(RawNode::property("a-node", "a"))
        .with_node(RawNode::property("b-node", "b"))
        .with_node(RawNode::new("nand", NodeKind::BooleanNand))
        .with_edge(check("nand", "npc", 0))
        .with_edge(Edge::new("a-node", "a-node.out", "nand", "nand.a"))
        .with_edge(Edge::new("b-node", "b-node.out", "nand", "nand.b"));
    let graph = DialogueGraph::from_asset(asset).unwrap();

    let a = graph.property_id("a").unwrap();
    let b = graph.property_id("b").unwrap();
    assert_eq!(
        graph.start_node().lines[0].check_trees,
        vec![CheckTree::binary(
            BinaryOperation::Nand,
            CheckTree::leaf(a),
            CheckTree::leaf(b)
        )]
    );

    for (va, vb) in [(false, false), (false, true), (true, false), (true, true)] {
        let mut data = InstanceData::new();
        data.register_check("a", move |_: &LineContext<'_>| va);
        data.register_check("b", move |_: &LineContext<'_>| vb);

        let mut conversation = Conversation::new(&graph);
        conversation.reset();
        let expected = if !(va && vb) { "gated" } else { "fallback" };
        assert_eq!(conversation.progress_npc(&mut data), Ok(expected));
    }
}

#[test]
fn test_trigger_fires_once_for_wired_line_only() {
    let asset = GraphAsset::new("triggers")
        .with_property(Property::trigger("Give gold").with_guid("gold"))
        .with_node(
            RawNode::player("choice")
                .with_line(line("choice", 0, "Take the gold"))
                .with_line(line("choice", 1, "Refuse")),
        )
        .with_node(RawNode::property("gold-node", "gold"))
        .with_edge(trigger("choice", 0, "gold-node"));
    let graph = DialogueGraph::from_asset(asset).unwrap();

    let mut data = InstanceData::new();
    let fired = counter(&mut data, "gold");
    let mut conversation = Conversation::new(&graph);

    conversation.reset();
    conversation.progress_self(1, &mut data).unwrap();
    assert_eq!(fired.get(), 0);

    conversation.reset();
    conversation.progress_self(0, &mut data).unwrap();
    assert_eq!(fired.get(), 1);

    conversation.reset();
    conversation.progress_self(0, &mut data).unwrap();
    assert_eq!(fired.get(), 2);
}

/// Registers a trigger listener that logs `"<name>:<node>:<line>"`.
fn recorder(data: &mut InstanceData, property: &str, name: &'static str, log: &Rc<RefCell<Vec<String>>>) {
    let log = Rc::clone(log);
    data.register_trigger(property, move |ctx: &LineContext<'_>| {
        log.borrow_mut()
            .push(format!("{name}:{}:{}", ctx.node, ctx.line_index))
    });
}

#[test]
fn test_first_passing_line_wins_and_fires_its_triggers() {
    // line 0 fails, line 1 passes, line 2 is the fallback
    let asset = GraphAsset::new("three-lines")
        .with_property(Property::check("Closed").with_guid("closed"))
        .with_property(Property::check("Open").with_guid("open"))
        .with_property(Property::trigger("T1").with_guid("t1"))
        .with_property(Property::trigger("T2").with_guid("t2"))
        .with_node(
            RawNode::npc("npc")
                .with_line(line("npc", 0, "zero"))
                .with_line(line("npc", 1, "one"))
                .with_line(line("npc", 2, "two")),
        )
        .with_node(RawNode::property("closed-node", "closed"))
        .with_node(RawNode::property("open-node", "open"))
        .with_node(RawNode::property("t1-node", "t1"))
        .with_node(RawNode::property("t2-node", "t2"))
        .with_edge(check("closed-node", "npc", 0))
        .with_edge(check("open-node", "npc", 1))
        // wired t2 first
        .with_edge(trigger("npc", 1, "t2-node"))
        .with_edge(trigger("npc", 1, "t1-node"));
    let graph = DialogueGraph::from_asset(asset).unwrap();

    let mut data = InstanceData::new();
    data.register_check("closed", |_: &LineContext<'_>| false);
    data.register_check("open", |_: &LineContext<'_>| true);
    let log = Rc::new(RefCell::new(Vec::new()));
    recorder(&mut data, "t1", "t1", &log);
    recorder(&mut data, "t2", "t2", &log);

    let mut conversation = Conversation::new(&graph);
    conversation.reset();
    assert_eq!(conversation.progress_npc(&mut data), Ok("one"));
    assert_eq!(
        *log.borrow(),
        vec!["t2:npc:1".to_string(), "t1:npc:1".to_string()]
    );
    assert!(conversation.is_done());

    // with every check passing, the earliest line is still chosen
    data.register_check("closed", |_: &LineContext<'_>| true);
    log.borrow_mut().clear();
    conversation.reset();
    assert_eq!(conversation.progress_npc(&mut data), Ok("zero"));
    assert!(log.borrow().is_empty());
}

#[test]
fn test_npc_trigger_fires_on_selected_line() {
    let asset = GraphAsset::new("npc-trigger")
        .with_property(Property::trigger("Alarm").with_guid("alarm"))
        .with_node(RawNode::npc("guard").with_line(line("guard", 0, "Intruder!")))
        .with_node(RawNode::property("alarm-node", "alarm"))
        .with_edge(trigger("guard", 0, "alarm-node"));
    let graph = DialogueGraph::from_asset(asset).unwrap();

    let mut data = InstanceData::new();
    let fired = counter(&mut data, "alarm");
    let mut conversation = Conversation::new(&graph);
    conversation.reset();
    conversation.progress_npc(&mut data).unwrap();

    assert_eq!(fired.get(), 1);
}

#[test]
fn test_linear_chain_walks_to_done() {
    let asset = GraphAsset::new("chain")
        .with_node(RawNode::player("A").with_line(line("A", 0, "a")))
        .with_node(RawNode::player("B").with_line(line("B", 0, "b")))
        .with_node(RawNode::player("C").with_line(line("C", 0, "c")))
        .with_edge(next("A", 0, "B"))
        .with_edge(next("B", 0, "C"));
    let graph = DialogueGraph::from_asset(asset).unwrap();
    let mut data = InstanceData::new();
    let mut conversation = Conversation::new(&graph);

    conversation.reset();
    let mut visited = Vec::new();
    let mut said = Vec::new();
    while !conversation.is_done() {
        visited.push(conversation.current_node_guid().unwrap().to_string());
        said.push(conversation.progress_self(0, &mut data).unwrap());
    }

    assert_eq!(visited, vec!["A", "B", "C"]);
    assert_eq!(said, vec!["a", "b", "c"]);
    assert!(conversation.current_node().is_none());
}

#[test]
fn test_example_scenario() {
    let asset = GraphAsset::new("example")
        .with_property(Property::actor("Captain").with_guid("A1"))
        .with_node(RawNode::npc("N1").with_line(line("N1", 0, "Hi")))
        .with_node(RawNode::npc("N2").with_line(line("N2", 0, "Bye")))
        .with_node(RawNode::property("A1-node", "A1"))
        .with_edge(Edge::new("A1-node", "A1-node.out", "N1", "N1.in"))
        .with_edge(next("N1", 0, "N2"));
    let graph = DialogueGraph::from_asset(asset).unwrap();

    assert_eq!(graph.start_node().guid.as_str(), "N1");
    assert_eq!(graph.start_node().lines[0].next, graph.node_id("N2"));

    let mut data = InstanceData::new();
    data.register_actor("A1", ActorData::new("Captain Vell"));

    let mut conversation = Conversation::new(&graph);
    conversation.reset();
    assert_eq!(conversation.current_actor(&data).unwrap().name, "Captain Vell");
    assert_eq!(conversation.progress_npc(&mut data), Ok("Hi"));
    assert_eq!(conversation.current_node_guid().unwrap().as_str(), "N2");
}

#[test]
fn test_walkers_sharing_a_graph_are_independent() {
    let asset = GraphAsset::new("shared")
        .with_property(Property::check("Door open").with_guid("door"))
        .with_property(Property::trigger("Open door").with_guid("open"))
        .with_node(
            RawNode::npc("A")
                .with_line(line("A", 0, "The door is open."))
                .with_line(line("A", 1, "I'll open it.")),
        )
        .with_node(RawNode::property("door-node", "door"))
        .with_node(RawNode::property("open-node", "open"))
        .with_edge(check("door-node", "A", 0))
        .with_edge(trigger("A", 1, "open-node"));
    let graph = DialogueGraph::from_asset(asset).unwrap();

    let mut registry = InstanceRegistry::new();
    let first = graph.asset_guid().clone();
    let second = Guid::from("shared-copy");

    let mut counts = Vec::new();
    let mut check_calls = Vec::new();
    for asset in [&first, &second] {
        let data = registry.get_or_create(asset);
        counts.push(counter(data, "open"));
        let calls = Rc::new(Cell::new(0u32));
        let handle = Rc::clone(&calls);
        data.register_check("door", move |_: &LineContext<'_>| {
            handle.set(handle.get() + 1);
            false
        });
        check_calls.push(calls);
    }

    let mut walker_one = Conversation::new(&graph);
    let mut walker_two = Conversation::new(&graph);
    walker_one.reset();
    walker_two.reset();

    let said = walker_one
        .progress_npc(registry.get_mut(first.as_str()).unwrap())
        .unwrap();
    assert_eq!(said, "I'll open it.");

    assert_eq!((counts[0].get(), check_calls[0].get()), (1, 1));
    assert_eq!((counts[1].get(), check_calls[1].get()), (0, 0));
    assert!(walker_one.is_done());
    assert!(walker_two.is_active());
    assert_eq!(walker_two.current_node_guid().unwrap().as_str(), "A");
}

#[test]
fn test_asset_from_json_builds_and_walks() {
    let json = r#"{
        "schema_version": 1,
        "asset_guid": "json-asset",
        "properties": [
            { "guid": "p-actor", "display_name": "Smith", "reference_name": "SMITH", "property_type": "Actor" }
        ],
        "nodes": [
            { "guid": "n1", "kind": "NPC", "lines": [
                { "message": "Need a blade?", "next_port": "n1-next", "trigger_port": "n1-trig", "check_port": "n1-check" }
            ] },
            { "guid": "s1", "kind": "SELF", "lines": [
                { "message": "Not today.", "next_port": "s1-next", "trigger_port": "s1-trig", "check_port": "s1-check" }
            ] },
            { "guid": "actor", "kind": "PROP", "property": "p-actor" }
        ],
        "edges": [
            { "from_node": "actor", "from_port": "actor-out", "to_node": "n1", "to_port": "n1-in" },
            { "from_node": "n1", "from_port": "n1-next", "to_node": "s1", "to_port": "s1-in" }
        ]
    }"#;

    let asset = GraphAsset::from_json_str(json).unwrap();
    let graph = DialogueGraph::from_asset(asset).unwrap();
    let actor = graph.property_by_reference_name("SMITH").unwrap();

    let mut data = InstanceData::new();
    data.register_actor(actor.guid.clone(), ActorData::new("Smith"));

    let mut conversation = Conversation::new(&graph);
    conversation.reset();
    assert_eq!(conversation.current_actor(&data).unwrap().name, "Smith");
    assert_eq!(conversation.progress_npc(&mut data), Ok("Need a blade?"));
    assert_eq!(conversation.progress_self(0, &mut data), Ok("Not today."));
    assert!(conversation.is_done());
}
