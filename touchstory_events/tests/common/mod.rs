// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory DOM host for integration tests.
//!
//! The tree starts with the window, the document, the `html` element and the
//! `body`. Native listeners are recorded per node; [`send`] simulates capture,
//! target and bubble phases by calling [`Events::deliver`] for each of them.

#![allow(
    missing_docs,
    dead_code,
    reason = "Integration-test helper module; not every test file uses every helper."
)]

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use touchstory_events::{
    ElementInfo, Event, Events, EventsConfig, Handler, Host, ListenerId, Outcome, RawEvent,
    VirtualRoot,
};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub usize);

pub const WINDOW: NodeId = NodeId(0);
pub const DOCUMENT: NodeId = NodeId(1);
pub const HTML: NodeId = NodeId(2);
pub const BODY: NodeId = NodeId(3);

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    element: Option<(String, String, String)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attached {
    pub node: NodeId,
    pub event_type: String,
    pub listener: ListenerId,
    pub capture: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct AttachRefused;

#[derive(Debug)]
pub struct Dom {
    nodes: Vec<Node>,
    pub attached: Vec<Attached>,
    pub attach_calls: usize,
    pub detach_calls: Vec<Attached>,
    /// Raw event types whose listeners fail to attach.
    pub refuse: Vec<String>,
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            attached: Vec::new(),
            attach_calls: 0,
            detach_calls: Vec::new(),
            refuse: Vec::new(),
        };
        dom.nodes.push(Node {
            parent: None,
            element: None,
        });
        dom.nodes.push(Node {
            parent: None,
            element: None,
        });
        dom.add(DOCUMENT, "HTML", "", "");
        dom.add(HTML, "BODY", "", "");
        dom
    }

    /// Appends an element below `parent`.
    pub fn add(&mut self, parent: NodeId, tag: &str, id: &str, class: &str) -> NodeId {
        self.nodes.push(Node {
            parent: Some(parent),
            element: Some((tag.into(), id.into(), class.into())),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Listeners attached to `node` for `event_type`.
    pub fn listeners_on(&self, node: NodeId, event_type: &str) -> Vec<Attached> {
        self.attached
            .iter()
            .filter(|a| a.node == node && a.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Root-first path to `target`.
    pub fn path(&self, target: NodeId) -> Vec<NodeId> {
        let mut path = vec![target];
        let mut node = target;
        while let Some(parent) = self.nodes[node.0].parent {
            path.push(parent);
            node = parent;
        }
        path.reverse();
        path
    }
}

impl Host for Dom {
    type Handle = NodeId;
    type Error = AttachRefused;

    fn parent(&self, handle: &NodeId) -> Option<NodeId> {
        self.nodes.get(handle.0)?.parent
    }

    fn element(&self, handle: &NodeId) -> Option<ElementInfo<'_>> {
        let (tag_name, id, class_name) = self.nodes.get(handle.0)?.element.as_ref()?;
        Some(ElementInfo {
            tag_name,
            id,
            class_name,
        })
    }

    fn query(&self, selector: &str, context: Option<&NodeId>) -> Vec<NodeId> {
        let root = context.copied().unwrap_or(DOCUMENT);
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|&n| n != root && self.path(n).contains(&root))
            .filter(|n| touchstory_events::delegate::matches(self.element(n).as_ref(), selector))
            .collect()
    }

    fn virtual_root(&self, root: VirtualRoot) -> Option<NodeId> {
        Some(match root {
            VirtualRoot::Window => WINDOW,
            VirtualRoot::Document => DOCUMENT,
            VirtualRoot::DocumentElement => HTML,
        })
    }

    fn body(&self) -> Option<NodeId> {
        Some(BODY)
    }

    fn add_listener(
        &mut self,
        handle: &NodeId,
        event_type: &str,
        listener: ListenerId,
        capture: bool,
    ) -> Result<(), AttachRefused> {
        self.attach_calls += 1;
        if self.refuse.iter().any(|t| t == event_type) {
            return Err(AttachRefused);
        }
        self.attached.push(Attached {
            node: *handle,
            event_type: event_type.into(),
            listener,
            capture,
        });
        Ok(())
    }

    fn remove_listener(&mut self, handle: &NodeId, event_type: &str, listener: ListenerId, capture: bool) {
        let gone = Attached {
            node: *handle,
            event_type: event_type.into(),
            listener,
            capture,
        };
        self.attached.retain(|a| *a != gone);
        self.detach_calls.push(gone);
    }
}

pub fn events() -> Events<Dom> {
    Events::new(Dom::new())
}

pub fn ios_events() -> Events<Dom> {
    Events::with_config(
        Dom::new(),
        EventsConfig {
            ios_double_tap: true,
            ..EventsConfig::default()
        },
    )
}

/// Delivers `raw` along the target's path: capture listeners root first, then
/// bubble listeners target first. Stops after the node where propagation was
/// stopped.
pub fn send(events: &mut Events<Dom>, mut raw: RawEvent<NodeId>) -> Outcome {
    let path = events.host().path(raw.target);
    let mut phases: Vec<(NodeId, bool)> = path.iter().map(|&n| (n, true)).collect();
    phases.extend(path.iter().rev().map(|&n| (n, false)));

    let mut total = Outcome::default();
    for (node, capture) in phases {
        let ids: Vec<ListenerId> = events
            .host()
            .listeners_on(node, &raw.event_type)
            .into_iter()
            .filter(|a| a.capture == capture)
            .map(|a| a.listener)
            .collect();
        for id in ids {
            let outcome = events.deliver(id, &mut raw);
            total.default_prevented |= outcome.default_prevented;
            total.propagation_stopped |= outcome.propagation_stopped;
            total.immediate_propagation_stopped |= outcome.immediate_propagation_stopped;
            if outcome.immediate_propagation_stopped {
                break;
            }
        }
        if total.propagation_stopped {
            break;
        }
    }
    total
}

pub fn touch_start(events: &mut Events<Dom>, target: NodeId, x: f64, y: f64, t: u64) -> Outcome {
    send(events, RawEvent::touch_start(target, Point::new(x, y), t))
}

pub fn touch_move(events: &mut Events<Dom>, target: NodeId, x: f64, y: f64, t: u64) -> Outcome {
    send(events, RawEvent::touch_move(target, Point::new(x, y), t))
}

pub fn touch_end(events: &mut Events<Dom>, target: NodeId, x: f64, y: f64, t: u64) -> Outcome {
    send(events, RawEvent::touch_end(target, Point::new(x, y), t))
}

/// A stationary tap.
pub fn tap(events: &mut Events<Dom>, target: NodeId, x: f64, y: f64, t: u64) {
    touch_start(events, target, x, y, t);
    touch_end(events, target, x, y, t + 60);
}

pub fn click(events: &mut Events<Dom>, target: NodeId, t: u64) -> Outcome {
    send(events, RawEvent::new("click", target, t))
}

/// A shared, ordered record of what ran.
#[derive(Clone, Debug, Default)]
pub struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// A handler logging `label`.
    pub fn handler(&self, label: &str) -> Handler<Dom> {
        let log = self.clone();
        let label = label.to_owned();
        Handler::new(move |_: &mut Events<Dom>, _: &mut Event<NodeId>| log.push(label.clone()))
    }

    /// A handler logging `label:<event type>`.
    pub fn typed(&self, label: &str) -> Handler<Dom> {
        let log = self.clone();
        let label = label.to_owned();
        Handler::new(move |_: &mut Events<Dom>, event: &mut Event<NodeId>| {
            log.push(format!("{label}:{}", event.event_type));
        })
    }
}
