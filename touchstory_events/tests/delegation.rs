// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegated bindings: handlers on an ancestor that run for matching descendants.

mod common;

use common::{BODY, Dom, Log, NodeId, click, events, tap};
use touchstory_events::{Binding, Elements, Event, Events, Handler};

/// `body > ul#list > li.item > span`, plus a sibling `li.item` outside the list.
struct Page {
    list: NodeId,
    item: NodeId,
    span: NodeId,
    plain: NodeId,
    outside: NodeId,
}

fn page(events: &mut Events<Dom>) -> Page {
    let dom = events.host_mut();
    let list = dom.add(BODY, "ul", "list", "");
    let item = dom.add(list, "li", "", "row item");
    let span = dom.add(item, "span", "", "label");
    let plain = dom.add(list, "li", "", "row");
    let outside = dom.add(BODY, "li", "", "item");
    Page {
        list,
        item,
        span,
        plain,
        outside,
    }
}

fn targets(log: &Log) -> Handler<Dom> {
    let log = log.clone();
    Handler::new(move |_: &mut Events<Dom>, event: &mut Event<NodeId>| {
        log.push(format!(
            "{}<{}@{}",
            event.current_target.0, event.target.0, event.bound.0
        ));
    })
}

#[test]
fn delegated_handler_runs_for_matching_descendants() {
    let mut events = events();
    let p = page(&mut events);
    let log = Log::default();
    events
        .on(
            &Elements::single(p.list),
            "click",
            Binding::new(targets(&log)).delegate(".item"),
        )
        .unwrap();

    // Through an intermediate non-matching node.
    click(&mut events, p.span, 0);
    assert_eq!(
        log.take(),
        [format!("{}<{}@{}", p.item.0, p.span.0, p.list.0)]
    );

    click(&mut events, p.item, 1);
    assert_eq!(log.len(), 1);
    log.take();

    // A non-matching child and a matching element outside the subtree.
    click(&mut events, p.plain, 2);
    click(&mut events, p.outside, 3);
    click(&mut events, p.list, 4);
    assert_eq!(log.len(), 0);
}

#[test]
fn delegated_and_direct_bindings_are_separate() {
    let mut events = events();
    let p = page(&mut events);
    let els = Elements::single(p.list);
    let log = Log::default();
    let h = log.handler("delegated");
    events.on(&els, "click", Binding::new(h.clone()).delegate("li")).unwrap();
    events.on(&els, "click", log.handler("direct")).unwrap();
    assert_eq!(events.host().listeners_on(p.list, "click").len(), 2);

    click(&mut events, p.plain, 0);
    assert_eq!(log.take(), ["delegated", "direct"]);

    // Unbinding needs the same selector.
    events.un(&els, "click", &h);
    click(&mut events, p.plain, 1);
    assert_eq!(log.take(), ["delegated", "direct"]);

    events.un(&els, "click", Binding::new(h.clone()).delegate("li"));
    click(&mut events, p.plain, 2);
    assert_eq!(log.take(), ["direct"]);
    assert!(!events.has_listener(&p.list, "click", Some("li")));
}

#[test]
fn id_and_tag_selectors() {
    let mut events = events();
    let p = page(&mut events);
    let log = Log::default();
    events
        .on(
            &Elements::single(BODY),
            "click",
            Binding::new(log.handler("id")).delegate("UL#list"),
        )
        .unwrap();
    events
        .on(
            &Elements::single(BODY),
            "click",
            Binding::new(log.handler("tag")).delegate("SPAN"),
        )
        .unwrap();

    // Listeners run in attach order.
    click(&mut events, p.span, 0);
    assert_eq!(log.take(), ["id", "tag"]);
    click(&mut events, p.outside, 1);
    assert_eq!(log.len(), 0);
}

#[test]
fn delegated_gestures() {
    let mut events = events();
    let p = page(&mut events);
    let log = Log::default();
    events
        .on(
            &Elements::single(p.list),
            "tap",
            Binding::new(log.typed("item")).delegate(".item"),
        )
        .unwrap();

    tap(&mut events, p.span, 10.0, 10.0, 0);
    tap(&mut events, p.plain, 10.0, 10.0, 1_000);
    assert_eq!(log.take(), ["item:tap"]);
}
