// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `touchstory_events`: raw delivery fan-out, delegation depth
//! and gesture recognition.

use std::convert::Infallible;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kurbo::Point;
use touchstory_events::{
    Binding, ElementInfo, Elements, Event, Events, Handler, Host, ListenerId, RawEvent,
};

/// A chain of `div.level` elements; node `i` is the parent of node `i + 1`.
#[derive(Debug, Default)]
struct Chain {
    depth: usize,
    attached: Vec<(usize, String, ListenerId)>,
}

impl Host for Chain {
    type Handle = usize;
    type Error = Infallible;

    fn parent(&self, handle: &usize) -> Option<usize> {
        handle.checked_sub(1)
    }

    fn element(&self, handle: &usize) -> Option<ElementInfo<'_>> {
        (*handle < self.depth).then_some(ElementInfo {
            tag_name: "div",
            id: "",
            class_name: if *handle == 0 { "root" } else { "level" },
        })
    }

    fn add_listener(
        &mut self,
        handle: &usize,
        event_type: &str,
        listener: ListenerId,
        _capture: bool,
    ) -> Result<(), Infallible> {
        self.attached.push((*handle, event_type.into(), listener));
        Ok(())
    }

    fn remove_listener(&mut self, _: &usize, _: &str, listener: ListenerId, _: bool) {
        self.attached.retain(|(_, _, l)| *l != listener);
    }
}

fn chain(depth: usize) -> Events<Chain> {
    Events::new(Chain {
        depth,
        attached: Vec::new(),
    })
}

fn listener(events: &Events<Chain>, handle: usize, event_type: &str) -> ListenerId {
    events
        .host()
        .attached
        .iter()
        .find(|(h, t, _)| *h == handle && t == event_type)
        .map(|(_, _, l)| *l)
        .expect("listener attached")
}

fn counter() -> Handler<Chain> {
    Handler::new(|_: &mut Events<Chain>, event: &mut Event<usize>| {
        black_box(event.time_stamp);
    })
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("deliver_fan_out");
    for &n in &[1_usize, 8, 64] {
        let mut events = chain(1);
        for _ in 0..n {
            events.on(&Elements::single(0), "click", counter()).unwrap();
        }
        let id = listener(&events, 0, "click");
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let mut raw = RawEvent::new("click", 0, 0);
            b.iter(|| black_box(events.deliver(id, &mut raw)));
        });
    }
    group.finish();
}

fn bench_delegation(c: &mut Criterion) {
    let mut group = c.benchmark_group("delegate_depth");
    for &depth in &[2_usize, 16, 128] {
        let mut events = chain(depth);
        events
            .on(
                &Elements::single(0),
                "click",
                Binding::new(counter()).delegate("div.level"),
            )
            .unwrap();
        let id = listener(&events, 0, "click");
        let target = depth - 1;
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            let mut raw = RawEvent::new("click", target, 0);
            b.iter(|| black_box(events.deliver(id, &mut raw)));
        });
    }
    group.finish();
}

fn bench_tap(c: &mut Criterion) {
    let mut events = chain(1);
    events
        .on(&Elements::single(0), "tap doubleTap swipe", counter())
        .unwrap();
    let start = listener(&events, 0, "touchstart");
    let end = listener(&events, 0, "touchend");
    let mut t = 0_u64;
    c.bench_function("tap_recognition", |b| {
        b.iter(|| {
            t += 1_000;
            let mut down = RawEvent::touch_start(0, Point::new(10.0, 10.0), t);
            let mut up = RawEvent::touch_end(0, Point::new(11.0, 10.0), t + 50);
            events.deliver(start, &mut down);
            black_box(events.deliver(end, &mut up))
        });
    });
}

criterion_group!(benches, bench_fan_out, bench_delegation, bench_tap);
criterion_main!(benches);
