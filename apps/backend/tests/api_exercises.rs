//! Exercise and answer-check API tests.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::fixtures;
use common::TestContext;

/// The pronoun scenario: four choices, exactly one correct, and it is the answer.
#[tokio::test]
async fn test_translate_to_base_from_vocab() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    let response = server
        .post("/api/exercises/translate-to-base")
        .json(&json!({ "vocab": fixtures::pronoun_vocab(), "seed": 7 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["kind"], "translate-to-base");
    assert_eq!(body["badge"], "NEW WORD");

    let choices = body["choices"].as_array().unwrap();
    assert_eq!(choices.len(), 4);
    let correct: Vec<&Value> = choices.iter().filter(|c| c["isCorrect"] == true).collect();
    assert_eq!(correct.len(), 1);
    assert_eq!(body["answers"], json!([correct[0]["value"]]));

    let labels: Vec<&str> = choices.iter().map(|c| c["label"].as_str().unwrap()).collect();
    for target in ["I", "you", "he", "she"] {
        assert!(labels.contains(&target));
    }
}

#[tokio::test]
async fn test_same_seed_same_exercise() {
    let ctx = TestContext::empty();
    let server = ctx.server();
    let request = json!({ "vocab": fixtures::pronoun_vocab(), "seed": 11 });

    let first: Value = server
        .post("/api/exercises/translate-to-base")
        .json(&request)
        .await
        .json();
    let second: Value = server
        .post("/api/exercises/translate-to-base")
        .json(&request)
        .await
        .json();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_translate_to_target_through_manifest() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/exercises/translate-to-target")
        .json(&json!({ "context": fixtures::manifest_context("lesson-01"), "seed": 2 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["kind"], "translate-to-target");
    assert_eq!(body["badge"], "TRANSLATE");
    let choices = body["choices"].as_array().unwrap();
    assert_eq!(choices.len(), 4);
    assert!(choices.iter().all(|c| c["transliteration"].is_string()));
}

#[tokio::test]
async fn test_prepared_choice_config() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    let response = server
        .post("/api/exercises/translate-to-base")
        .json(&json!({
            "config": {
                "prompt": "මම",
                "choices": [{ "label": "I", "isCorrect": true }, "you"]
            }
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["answers"], json!(["I"]));
    assert_eq!(body["instructions"], "Select the matching English meaning.");
}

#[tokio::test]
async fn test_insufficient_vocabulary() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    let response = server
        .post("/api/exercises/translate-to-base")
        .json(&json!({ "vocab": [
            { "si": "මම", "en": "I" },
            { "si": "ඔයා", "en": "you" }
        ] }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "configuration_error");
}

#[tokio::test]
async fn test_match_pairs() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    let response = server
        .post("/api/exercises/match-pairs")
        .json(&json!({ "vocab": fixtures::pronoun_vocab(), "seed": 5 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["kind"], "match-pairs");
    assert_eq!(body["pairs"].as_array().unwrap().len(), 4);
    assert_eq!(body["baseColumn"].as_array().unwrap().len(), 4);
    assert_eq!(body["targetColumn"].as_array().unwrap().len(), 4);
    assert_eq!(body["baseColumn"][0]["column"], "base");
}

#[tokio::test]
async fn test_dialogue() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    let response = server
        .post("/api/exercises/dialogue")
        .json(&json!({ "config": fixtures::dialogue_config() }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["kind"], "dialogue");
    assert_eq!(body["turns"][0]["type"], "statement");
    assert_eq!(body["turns"][0]["role"], "tutor");
    assert_eq!(body["turns"][1]["answers"], json!(["ayubowan"]));
    assert_eq!(body["turns"][1]["delay"], 500);
}

#[tokio::test]
async fn test_dialogue_requires_config() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    let response = server.post("/api/exercises/dialogue").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fill_blank() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    let response = server
        .post("/api/exercises/fill-blank")
        .json(&json!({ "config": fixtures::fill_blank_config() }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["kind"], "fill-blank");
    assert_eq!(body["blankPlaceholder"], "_____");
    assert_eq!(body["choices"][1]["isCorrect"], true);
    assert_eq!(body["choices"][0]["isCorrect"], false);
}

#[tokio::test]
async fn test_word_bank_for_unit_sentence() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/exercises/word-bank")
        .json(&json!({ "unitId": "unit-02", "sentenceIndex": 0, "seed": 3 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["kind"], "word-bank");
    assert_eq!(body["direction"], "to-base");
    assert_eq!(body["prompt"], "I you");
    assert_eq!(body["answer"], json!(["මම", "ඔයා"]));
    assert_eq!(body["tiles"].as_array().unwrap().len(), 6);
    assert_eq!(body["answerTileIds"], json!(["tile-1", "tile-2"]));
}

/// Only the sentence unlocked at unit 2 is available.
#[tokio::test]
async fn test_word_bank_locked_sentence() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/exercises/word-bank")
        .json(&json!({ "unitId": "unit-02", "sentenceIndex": 1 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_exercise_kind() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    let response = server.post("/api/exercises/speak").json(&json!({})).await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_check_answer_value() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    let response = server
        .post("/api/answers/check")
        .json(&json!({ "answers": ["You"], "value": "  YOU " }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["correct"], true);
}

/// Word order matters: an adjacent swap fails.
#[tokio::test]
async fn test_check_answer_sequence() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    let correct: Value = server
        .post("/api/answers/check")
        .json(&json!({ "answers": ["මම", "ඔයා"], "attempt": ["මම", "ඔයා"] }))
        .await
        .json();
    let swapped: Value = server
        .post("/api/answers/check")
        .json(&json!({ "answers": ["මම", "ඔයා"], "attempt": ["ඔයා", "මම"] }))
        .await
        .json();

    assert_eq!(correct["correct"], true);
    assert_eq!(swapped["correct"], false);
}
