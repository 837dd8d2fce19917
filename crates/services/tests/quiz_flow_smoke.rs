use quiz_core::QuizReport;
use quiz_core::model::{Leverage, Question, QuestionSet};
use quiz_core::time::fixed_clock;
use services::{DispatchOutcome, QuizAction, QuizFlowService};
use storage::repository::Storage;

fn question_set() -> QuestionSet {
    let questions = (0..10)
        .map(|i| {
            Question::new(
                format!("q{i}"),
                format!("Question {i}?"),
                vec![
                    "Option A".into(),
                    "Option B".into(),
                    "Option C".into(),
                    "Option D".into(),
                ],
                0,
                Some("Option A is correct.".into()),
            )
            .unwrap()
        })
        .collect();
    QuestionSet::new(questions).unwrap()
}

#[tokio::test]
async fn full_quiz_flow_with_leverage_and_resume() {
    let storage = Storage::in_memory();
    let flow = QuizFlowService::new(fixed_clock(), storage.sessions.clone());

    let mut session = flow.start("current", "History", question_set()).await.unwrap();

    // Triple the first question, answer it correctly.
    let outcome = flow
        .dispatch(
            "current",
            &mut session,
            QuizAction::SelectLeverage(Leverage::Triple),
        )
        .await
        .unwrap();
    assert!(outcome.changed);

    let outcome = flow
        .dispatch("current", &mut session, QuizAction::Answer(0))
        .await
        .unwrap();
    let answer = outcome.answer.unwrap();
    assert!(answer.correct);
    assert_eq!(answer.points, 30);
    assert_eq!(session.score(), 30);
    assert!(session.leverages().is_used(Leverage::Triple));

    flow.dispatch("current", &mut session, QuizAction::Advance)
        .await
        .unwrap();

    // Miss the second question without leverage.
    let outcome = flow
        .dispatch("current", &mut session, QuizAction::Answer(3))
        .await
        .unwrap();
    let answer = outcome.answer.unwrap();
    assert!(!answer.correct);
    assert_eq!(answer.points, -10);
    assert_eq!(session.score(), 20);

    // Resuming from the store restores the exact same state.
    let resumed = flow.resume("current").await.unwrap().unwrap();
    assert_eq!(resumed, session);

    // Play the rest of the quiz out.
    loop {
        let DispatchOutcome { is_complete, .. } = flow
            .dispatch("current", &mut session, QuizAction::Advance)
            .await
            .unwrap();
        if is_complete {
            break;
        }
        flow.dispatch("current", &mut session, QuizAction::Answer(0))
            .await
            .unwrap();
    }

    assert!(session.is_complete());
    // 9 correct at +10 (one tripled to +30) and one miss at -10.
    assert_eq!(session.score(), 100);

    let report = QuizReport::from_session(&session).unwrap();
    assert_eq!(report.correct_count(), 9);
    assert_eq!(report.percentage(), 90);
    assert_eq!(report.final_score(), 100);

    flow.clear("current").await.unwrap();
    assert!(flow.resume("current").await.unwrap().is_none());
}

#[tokio::test]
async fn unchanged_dispatches_do_not_persist_or_mutate() {
    let storage = Storage::in_memory();
    let flow = QuizFlowService::new(fixed_clock(), storage.sessions.clone());

    let mut session = flow.start("current", "History", question_set()).await.unwrap();

    // Advancing before answering is rejected.
    let outcome = flow
        .dispatch("current", &mut session, QuizAction::Advance)
        .await
        .unwrap();
    assert!(!outcome.changed);
    assert_eq!(session.current_index(), 0);

    flow.dispatch("current", &mut session, QuizAction::Answer(0))
        .await
        .unwrap();

    // Re-answering an answered question is a no-op that echoes the
    // recorded outcome.
    let outcome = flow
        .dispatch("current", &mut session, QuizAction::Answer(2))
        .await
        .unwrap();
    assert!(!outcome.changed);
    let answer = outcome.answer.unwrap();
    assert_eq!(answer.choice, 0);
    assert_eq!(session.score(), 10);

    // Leverage cannot be armed once the question is answered.
    let outcome = flow
        .dispatch(
            "current",
            &mut session,
            QuizAction::SelectLeverage(Leverage::Half),
        )
        .await
        .unwrap();
    assert!(!outcome.changed);
    assert!(!session.leverages().is_used(Leverage::Half));
}

#[tokio::test]
async fn reset_starts_over_and_persists() {
    let storage = Storage::in_memory();
    let flow = QuizFlowService::new(fixed_clock(), storage.sessions.clone());

    let mut session = flow.start("current", "History", question_set()).await.unwrap();
    flow.dispatch(
        "current",
        &mut session,
        QuizAction::SelectLeverage(Leverage::Double),
    )
    .await
    .unwrap();
    flow.dispatch("current", &mut session, QuizAction::Answer(0))
        .await
        .unwrap();

    let outcome = flow
        .dispatch(
            "current",
            &mut session,
            QuizAction::Reset {
                topic: Some("Space".into()),
                questions: None,
            },
        )
        .await
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(session.topic(), "Space");
    assert_eq!(session.score(), 0);
    assert_eq!(session.answered_count(), 0);
    assert!(!session.leverages().is_used(Leverage::Double));

    let resumed = flow.resume("current").await.unwrap().unwrap();
    assert_eq!(resumed.topic(), "Space");
    assert_eq!(resumed.score(), 0);
}
