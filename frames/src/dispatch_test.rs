use super::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn token(message_id: &str, token: &str) -> Frame {
    Frame::ChatToken {
        message_id: message_id.to_owned(),
        token: token.to_owned(),
    }
}

fn skill_token(text: &str) -> Frame {
    Frame::SkillToken { token: text.to_owned() }
}

#[test]
fn listener_receives_only_its_kind() {
    let mut dispatcher = Dispatcher::new();
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&seen);
    dispatcher.on(FrameKind::ChatToken, move |frame| {
        sink.borrow_mut().push(frame.text_delta().unwrap_or_default().to_owned());
    });

    assert_eq!(dispatcher.dispatch(&token("m1", "a")), 1);
    assert_eq!(dispatcher.dispatch(&skill_token("ignored")), 0);
    assert_eq!(dispatcher.dispatch(&token("m1", "b")), 1);

    assert_eq!(*seen.borrow(), vec!["a".to_owned(), "b".to_owned()]);
}

#[test]
fn independent_features_both_receive_their_frames() {
    let mut dispatcher = Dispatcher::new();
    let chat = Rc::new(Cell::new(0));
    let skill = Rc::new(Cell::new(0));
    let chat_count = Rc::clone(&chat);
    let skill_count = Rc::clone(&skill);
    dispatcher.on_each(&FrameKind::CHAT, move |_| chat_count.set(chat_count.get() + 1));
    dispatcher.on_each(&FrameKind::SKILL, move |_| skill_count.set(skill_count.get() + 1));

    dispatcher.dispatch(&token("m1", "x"));
    dispatcher.dispatch(&skill_token("y"));
    dispatcher.dispatch(&Frame::SkillComplete { usage: None });

    assert_eq!(chat.get(), 1);
    assert_eq!(skill.get(), 2);
}

#[test]
fn off_removes_listener_from_every_kind() {
    let mut dispatcher = Dispatcher::new();
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let id = dispatcher.on_each(&FrameKind::CHAT, move |_| counter.set(counter.get() + 1));

    dispatcher.dispatch(&token("m1", "x"));
    assert!(dispatcher.off(id));
    dispatcher.dispatch(&token("m1", "y"));
    dispatcher.dispatch(&Frame::ChatError {
        message_id: "m1".to_owned(),
        error: "boom".to_owned(),
    });

    assert_eq!(hits.get(), 1);
    assert!(!dispatcher.handles(FrameKind::ChatToken));
    assert!(!dispatcher.off(id));
}

#[test]
fn removing_one_listener_keeps_the_other() {
    let mut dispatcher = Dispatcher::new();
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    let a = Rc::clone(&first);
    let b = Rc::clone(&second);
    let first_id = dispatcher.on(FrameKind::ChatToken, move |_| a.set(a.get() + 1));
    dispatcher.on(FrameKind::ChatToken, move |_| b.set(b.get() + 1));

    dispatcher.off(first_id);
    dispatcher.dispatch(&token("m1", "x"));

    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
}

#[test]
fn unhandled_frames_reach_fallback_listeners() {
    let mut dispatcher = Dispatcher::new();
    let tags = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&tags);
    dispatcher.on_unhandled(move |frame| sink.borrow_mut().push(frame.type_tag().to_owned()));
    dispatcher.on(FrameKind::ChatToken, |_| {});

    dispatcher.dispatch(&token("m1", "x"));
    dispatcher.dispatch(&Frame::Pong);
    dispatcher.dispatch(&Frame::Unknown {
        kind: "progress".to_owned(),
        data: serde_json::json!({ "type": "progress" }),
    });

    assert_eq!(*tags.borrow(), vec!["pong".to_owned(), "progress".to_owned()]);
}

#[test]
fn listeners_run_in_registration_order() {
    let mut dispatcher = Dispatcher::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    for n in 0..3 {
        let sink = Rc::clone(&order);
        dispatcher.on(FrameKind::Pong, move |_| sink.borrow_mut().push(n));
    }
    dispatcher.dispatch(&Frame::Pong);
    assert_eq!(*order.borrow(), vec![0, 1, 2]);
}

#[test]
fn shared_dispatch_allows_listener_to_unregister_itself() {
    let dispatcher = Rc::new(RefCell::new(Dispatcher::new()));
    let hits = Rc::new(Cell::new(0));
    let own_id = Rc::new(Cell::new(None::<ListenerId>));

    let handle = Rc::clone(&dispatcher);
    let counter = Rc::clone(&hits);
    let id_slot = Rc::clone(&own_id);
    let id = dispatcher.borrow_mut().on(FrameKind::SkillComplete, move |_| {
        counter.set(counter.get() + 1);
        if let Some(id) = id_slot.get() {
            handle.borrow_mut().off(id);
        }
    });
    own_id.set(Some(id));

    let done = Frame::SkillComplete { usage: None };
    assert_eq!(dispatch_shared(&dispatcher, &done), 1);
    assert_eq!(dispatch_shared(&dispatcher, &done), 0);
    assert_eq!(hits.get(), 1);
}
