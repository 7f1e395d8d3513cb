use std::cell::RefCell;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use sonde_candid::{CandidEngine, Idx, Pool, Value, WireCodec};
use sonde_ir::{ErrorTree, Output, PathSeg, RenderContext};

use super::{CallMode, Caller, FormState, MethodForm, MethodSignature};
use crate::FormError;

struct NoCodec;

impl WireCodec for NoCodec {
    fn encode(&self, _: &Pool, _: Idx, _: &Value) -> Result<Vec<u8>, String> {
        Ok(Vec::new())
    }

    fn encode_args(&self, _: &Pool, _: &[Idx], _: &[Value]) -> Result<Vec<u8>, String> {
        Ok(Vec::new())
    }
}

/// Records every call and answers with a fixed reply.
struct Recorder {
    reply: Result<Vec<Value>, String>,
    calls: RefCell<Vec<(String, CallMode, Vec<Value>)>>,
}

impl Recorder {
    fn replying(reply: Result<Vec<Value>, String>) -> Self {
        Self {
            reply,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl Caller<Value> for Recorder {
    async fn call(
        &self,
        method: &str,
        mode: CallMode,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, String> {
        self.calls.borrow_mut().push((method.to_owned(), mode, args));
        self.reply.clone()
    }
}

fn path(segs: &[PathSeg]) -> Vec<PathSeg> {
    segs.to_vec()
}

fn idx(i: usize) -> PathSeg {
    PathSeg::Index(i)
}

fn field(name: &str) -> PathSeg {
    PathSeg::field(name)
}

fn cx() -> RenderContext {
    RenderContext::new(Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid"))
}

/// `greet : (record { name : text; age : nat8 }, vec nat8) -> (text)`
fn greet_engine() -> (CandidEngine<NoCodec>, MethodSignature<Idx>) {
    let mut pool = Pool::new();
    let person = pool.record_named(&[("name", Idx::TEXT), ("age", Idx::NAT8)]);
    let bytes = pool.vec(Idx::NAT8);
    let sig = MethodSignature::new("greet", vec![person, bytes], vec![Idx::TEXT], CallMode::Query);
    (CandidEngine::new(pool, NoCodec), sig)
}

// === Opening and editing ===

#[test]
fn opens_with_default_inputs() {
    let (engine, sig) = greet_engine();
    let form = MethodForm::open(&engine, sig);

    assert_eq!(form.inputs(), &json!([{ "name": "", "age": "" }, []]));
    assert_eq!(form.state(), FormState::Idle);
    assert_eq!(form.errors(), None);
    assert_eq!(form.output(), None);
}

#[test]
fn edit_revalidates_only_its_subtree() {
    let (engine, sig) = greet_engine();
    let mut form = MethodForm::open(&engine, sig);

    form.edit(&path(&[idx(0), field("age")]), json!("abc"))
        .expect("known path");
    assert_eq!(form.state(), FormState::Editing);
    assert_eq!(
        form.error_at(&[idx(0), field("age")]),
        Some(&ErrorTree::message("Cannot convert abc to a BigInt"))
    );

    form.edit(&path(&[idx(0), field("name")]), json!("Al"))
        .expect("known path");
    assert!(form.error_at(&[idx(0), field("age")]).is_some());
    assert_eq!(form.input_at(&[idx(0), field("name")]), Some(&json!("Al")));

    form.edit(&path(&[idx(0), field("age")]), json!("30"))
        .expect("known path");
    assert_eq!(form.errors(), None);
}

#[test]
fn edit_of_unknown_path_is_refused() {
    let (engine, sig) = greet_engine();
    let mut form = MethodForm::open(&engine, sig);

    assert!(matches!(
        form.edit(&[idx(5)], json!(1)),
        Err(FormError::UnknownPath(_))
    ));
    assert!(matches!(
        form.edit(&[idx(0), field("nope")], json!(1)),
        Err(FormError::UnknownPath(_))
    ));
    assert_eq!(form.state(), FormState::Idle);
}

#[test]
fn rebuilt_ancestor_drops_its_stale_error() {
    let (engine, sig) = greet_engine();
    let mut form = MethodForm::open(&engine, sig);

    form.edit(&[idx(0)], json!("x")).expect("known path");
    assert_eq!(
        form.error_at(&[idx(0)]),
        Some(&ErrorTree::message("invalid record"))
    );

    form.edit(&[idx(0), field("name")], json!("Al"))
        .expect("known path");
    assert_eq!(form.input_at(&[idx(0)]), Some(&json!({ "name": "Al", "age": "" })));
    assert_eq!(form.errors(), None);

    form.edit(&[idx(0), field("age")], json!("3")).expect("known path");
    assert_eq!(form.errors(), None);
    assert!(form.begin_submit().is_ok());
}

/// `pick : (variant { ok : nat8; err }) -> ()`
fn pick_engine() -> (CandidEngine<NoCodec>, MethodSignature<Idx>) {
    let mut pool = Pool::new();
    let result = pool.variant_named(&[("ok", Idx::NAT8), ("err", Idx::NULL)]);
    let sig = MethodSignature::new("pick", vec![result], Vec::new(), CallMode::Update);
    (CandidEngine::new(pool, NoCodec), sig)
}

#[test]
fn editing_another_variant_field_switches_the_selection() {
    let (engine, sig) = pick_engine();
    let mut form = MethodForm::open(&engine, sig);

    form.edit(&[idx(0)], json!({ "err": null })).expect("known path");
    form.edit(&[idx(0), field("ok")], json!("7")).expect("known path");

    assert_eq!(form.input_at(&[idx(0)]), Some(&json!({ "ok": "7" })));
    assert_eq!(form.errors(), None);
    assert_eq!(form.begin_submit().map(|args| args.len()), Ok(1));
}

#[test]
fn switching_variant_field_clears_the_old_fields_error() {
    let (engine, sig) = pick_engine();
    let mut form = MethodForm::open(&engine, sig);

    form.edit(&[idx(0), field("ok")], json!("x")).expect("known path");
    assert!(form.error_at(&[idx(0), field("ok")]).is_some());

    form.edit(&[idx(0), field("err")], json!(null)).expect("known path");
    assert_eq!(form.input_at(&[idx(0)]), Some(&json!({ "err": null })));
    assert_eq!(form.errors(), None);
}

// === Sequences ===

#[test]
fn push_appends_element_defaults() {
    let (engine, sig) = greet_engine();
    let mut form = MethodForm::open(&engine, sig);

    assert_eq!(form.push_element(&[idx(1)]), Ok(0));
    assert_eq!(form.push_element(&[idx(1)]), Ok(1));
    assert_eq!(form.input_at(&[idx(1)]), Some(&json!(["", ""])));
    assert!(matches!(
        form.push_element(&[idx(0)]),
        Err(FormError::NotASequence(_))
    ));
}

#[test]
fn deleting_an_element_shifts_later_errors_down() {
    let (engine, sig) = greet_engine();
    let mut form = MethodForm::open(&engine, sig);
    for _ in 0..3 {
        form.push_element(&[idx(1)]).expect("vec argument");
    }
    form.edit(&[idx(1), idx(0)], json!("1")).expect("known path");
    form.edit(&[idx(1), idx(1)], json!("2")).expect("known path");
    form.edit(&[idx(1), idx(2)], json!("x")).expect("known path");
    assert!(form.error_at(&[idx(1), idx(2)]).is_some());

    form.remove_element(&[idx(1)], 1).expect("in range");

    assert_eq!(form.input_at(&[idx(1)]), Some(&json!(["1", "x"])));
    assert_eq!(
        form.error_at(&[idx(1), idx(1)]),
        Some(&ErrorTree::message("Cannot convert x to a BigInt"))
    );
    assert_eq!(form.error_at(&[idx(1), idx(2)]), None);
    assert_eq!(form.error_at(&[idx(1), idx(0)]), None);
}

#[test]
fn delete_out_of_range_reports_length() {
    let (engine, sig) = greet_engine();
    let mut form = MethodForm::open(&engine, sig);
    form.push_element(&[idx(1)]).expect("vec argument");

    assert!(matches!(
        form.remove_element(&[idx(1)], 4),
        Err(FormError::IndexOutOfRange { index: 4, len: 1, .. })
    ));
}

// === Submission ===

#[test]
fn invalid_submission_goes_back_to_editing() {
    let (engine, sig) = greet_engine();
    let mut form = MethodForm::open(&engine, sig);
    form.edit(&[idx(0), field("age")], json!("old")).expect("known path");

    let Err(FormError::Invalid(tree)) = form.begin_submit() else {
        panic!("submission should be blocked");
    };
    assert_eq!(form.state(), FormState::Editing);
    assert_eq!(form.errors(), Some(&tree));
    assert!(tree.get(&[idx(0), field("age")]).is_some());
}

#[test]
fn second_submit_while_in_flight_is_refused() {
    let (engine, sig) = greet_engine();
    let mut form = MethodForm::open(&engine, sig);

    let args = form.begin_submit().expect("defaults are valid");
    assert_eq!(args.len(), 2);
    assert_eq!(form.state(), FormState::Submitting);
    assert_eq!(
        form.begin_submit(),
        Err(FormError::InFlight("greet".to_owned()))
    );
    assert_eq!(form.state(), FormState::Submitting);

    form.complete(Ok(vec![Value::text("hi")]));
    assert_eq!(form.state(), FormState::Idle);
}

#[tokio::test]
async fn submit_records_the_reply() {
    let (engine, sig) = greet_engine();
    let mut form = MethodForm::open(&engine, sig);
    form.edit(&[idx(0), field("name")], json!("Alice")).expect("known path");
    form.edit(&[idx(0), field("age")], json!("30")).expect("known path");
    let caller = Recorder::replying(Ok(vec![Value::text("hello")]));

    let output = form.submit(&caller).await.expect("valid arguments");
    assert_eq!(output, &Output::Result(vec![Value::text("hello")]));
    assert_eq!(form.state(), FormState::Idle);

    let calls = caller.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "greet");
    assert_eq!(calls[0].1, CallMode::Query);
    assert_eq!(calls[0].2[1], Value::Vec(Vec::new()));

    let rendered = form.render_output(&cx()).expect("settled call");
    assert_eq!(rendered.to_text(), "(5): hello");
}

#[tokio::test]
async fn rejected_call_becomes_an_error_output() {
    let (engine, sig) = greet_engine();
    let mut form = MethodForm::open(&engine, sig);
    let caller = Recorder::replying(Err("canister trapped".to_owned()));

    let output = form.submit(&caller).await.expect("valid arguments");
    assert!(output.is_error());
    let rendered = form.render_output(&cx()).expect("settled call");
    assert_eq!(rendered.to_text(), "error: canister trapped");
}

#[tokio::test]
async fn invalid_form_never_reaches_the_caller() {
    let (engine, sig) = greet_engine();
    let mut form = MethodForm::open(&engine, sig);
    form.edit(&[idx(1)], json!(["1", "two"])).expect("known path");
    let caller = Recorder::replying(Ok(Vec::new()));

    assert!(matches!(
        form.submit(&caller).await,
        Err(FormError::Invalid(_))
    ));
    assert!(caller.calls.borrow().is_empty());
    assert_eq!(form.render_output(&cx()), None);
}

#[test]
fn mode_labels() {
    assert_eq!(CallMode::Query.label(), "Query");
    assert_eq!(CallMode::Update.label(), "Call");
}
