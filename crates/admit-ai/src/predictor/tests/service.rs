use super::common::*;
use std::sync::Arc;

use crate::predictor::domain::{Category, InputKind, QualifierField};
use crate::predictor::error::{LookupError, ValidationError};
use crate::predictor::gateway::GatewayError;
use crate::predictor::normalizer::{QualifierValues, ScoreSubmission};
use crate::predictor::service::{PredictorError, PredictorService};
use crate::predictor::session::{SessionError, SessionId};
use crate::predictor::ScoreNormalizer;

#[test]
fn normalize_reports_canonical_rank() {
    let (service, _, _) = build_service();
    let score = service
        .normalize(&jee_main_submission())
        .expect("normalizes");
    assert_eq!(score.exam_id, "jee-main");
    assert_eq!(score.canonical_rank, 5_500);
}

#[test]
fn unknown_exam_is_a_lookup_error_not_a_default() {
    let (service, _, _) = build_service();
    let submission = ScoreSubmission::new("gate", InputKind::Rank, 10.0);
    let err = service.normalize(&submission).unwrap_err();
    assert!(matches!(
        err,
        PredictorError::Lookup(LookupError::ExamNotFound(ref id)) if id == "gate"
    ));
}

#[test]
fn assemble_builds_payload_for_state_exam() {
    let (service, _, _) = build_service();
    let request = service
        .assemble(&ts_eamcet_submission())
        .expect("assembles");
    assert_eq!(request.rank, 2_350);
    assert_eq!(request.category, Category::General);
    assert_eq!(request.home_state, None);
    assert!(request.preferred_branches.is_empty());
}

#[test]
fn assemble_names_missing_required_field() {
    let (service, _, _) = build_service();
    let mut submission = ts_eamcet_submission();
    submission.qualifiers.gender = None;

    let err = service.assemble(&submission).unwrap_err();
    assert!(matches!(
        err,
        PredictorError::Validation(ValidationError::MissingField(QualifierField::Gender))
    ));
}

#[tokio::test]
async fn predict_forwards_assembled_request_to_gateway() {
    let (service, gateway, _) = build_service();
    let outcome = service
        .predict(None, &jee_main_submission())
        .await
        .expect("prediction succeeds");

    assert_eq!(outcome.exam_id, "jee-main");
    assert_eq!(outcome.request.rank, 5_500);
    assert_eq!(outcome.results.len(), 2);

    let sent = gateway.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], outcome.request);
}

#[tokio::test]
async fn validation_failures_never_reach_the_gateway() {
    let (service, gateway, _) = build_service();
    let submission = ScoreSubmission::new("jee-main", InputKind::Percentile, 101.0)
        .with_qualifiers(jee_main_submission().qualifiers);

    let err = service.predict(None, &submission).await.unwrap_err();
    assert!(matches!(
        err,
        PredictorError::Validation(ValidationError::PercentileOutOfRange(_))
    ));

    let mut missing_category = jee_main_submission();
    missing_category.qualifiers.category = None;
    let err = service.predict(None, &missing_category).await.unwrap_err();
    assert!(matches!(
        err,
        PredictorError::Validation(ValidationError::MissingField(QualifierField::Category))
    ));

    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn gateway_errors_are_surfaced_with_their_kind() {
    let service = service_with_gateway(Arc::new(StubGateway::failing(GatewayError::Timeout)));
    let err = service
        .predict(None, &jee_main_submission())
        .await
        .unwrap_err();
    assert!(matches!(err, PredictorError::Gateway(GatewayError::Timeout)));
}

#[tokio::test]
async fn predict_records_outcome_on_session() {
    let (service, _, sessions) = build_service();
    let session = service.start_session().expect("session created");

    service
        .predict(Some(&session.session_id), &jee_main_submission())
        .await
        .expect("prediction succeeds");

    let stored = service.session(&session.session_id).expect("session present");
    assert_eq!(stored.last_exam_id.as_deref(), Some("jee-main"));
    assert_eq!(stored.last_request.map(|request| request.rank), Some(5_500));
    assert_eq!(stored.last_results.map(|results| results.results.len()), Some(2));
    assert!(stored.updated_at >= stored.created_at);
    assert_eq!(sessions.sessions.lock().expect("mutex").len(), 1);
}

#[tokio::test]
async fn predict_with_unknown_session_fails_before_gateway() {
    let (service, gateway, _) = build_service();
    let err = service
        .predict(Some(&SessionId("ses-missing".to_string())), &jee_main_submission())
        .await
        .unwrap_err();
    assert!(matches!(err, PredictorError::Session(SessionError::NotFound)));
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn second_prediction_for_same_session_is_refused_while_in_flight() {
    let gateway = Arc::new(HeldGateway::default());
    let service = service_with_gateway(gateway.clone());
    let session = service.start_session().expect("session created");
    let submission = jee_main_submission();

    let (first, second, ()) = tokio::join!(
        service.predict(Some(&session.session_id), &submission),
        service.predict(Some(&session.session_id), &submission),
        async { gateway.release() },
    );

    first.expect("first prediction completes");
    assert!(matches!(second, Err(PredictorError::InFlight(ref id)) if *id == session.session_id.0));
    assert_eq!(gateway.calls(), 1);

    gateway.release();
    service
        .predict(Some(&session.session_id), &submission)
        .await
        .expect("guard released after completion");
}

#[tokio::test]
async fn predictions_without_session_are_not_serialized() {
    let gateway = Arc::new(HeldGateway::default());
    let service = service_with_gateway(gateway.clone());
    let submission = jee_main_submission();

    let (first, second, ()) = tokio::join!(
        service.predict(None, &submission),
        service.predict(None, &submission),
        async { gateway.release() },
    );

    first.expect("first completes");
    second.expect("second completes");
    assert_eq!(gateway.calls(), 2);
}

#[test]
fn session_ids_are_random_and_not_sequential() {
    let (service, _, _) = build_service();
    let first = service.start_session().expect("session created").session_id;
    let second = service.start_session().expect("session created").session_id;

    assert_ne!(first, second);
    let token = |id: &SessionId| {
        let hex = id.0.strip_prefix("ses-").expect("ses- prefix");
        assert_eq!(hex.len(), 32, "{}", id.0);
        u128::from_str_radix(hex, 16).expect("hex token")
    };
    let (a, b) = (token(&first), token(&second));
    assert_ne!(a.wrapping_add(1), b);
    assert_ne!(b.wrapping_add(1), a);

    let guessed = SessionId(format!("ses-{:032x}", a.wrapping_add(1)));
    let err = service.clear_session(&guessed).unwrap_err();
    assert!(matches!(err, PredictorError::Session(SessionError::NotFound)));
    assert!(service.session(&second).is_ok());
}

#[test]
fn cleared_sessions_are_gone() {
    let (service, _, _) = build_service();
    let session = service.start_session().expect("session created");
    service
        .clear_session(&session.session_id)
        .expect("session cleared");

    let err = service.session(&session.session_id).unwrap_err();
    assert!(matches!(err, PredictorError::Session(SessionError::NotFound)));
}

#[test]
fn session_store_outage_is_reported() {
    let service = PredictorService::new(
        Arc::new(StubGateway::answering(college_results())),
        Arc::new(UnavailableSessions),
        ScoreNormalizer::default(),
    );
    let err = service.start_session().unwrap_err();
    assert!(matches!(
        err,
        PredictorError::Session(SessionError::Unavailable(_))
    ));
}

#[test]
fn work_experience_is_required_for_cat() {
    let (service, _, _) = build_service();
    let submission = ScoreSubmission::new("cat", InputKind::Percentile, 98.2).with_qualifiers(
        QualifierValues {
            category: Some("EWS".to_string()),
            gender: Some("Female".to_string()),
            academic_profile: Some("B.Tech 8.1 CGPA".to_string()),
            ..QualifierValues::default()
        },
    );

    let err = service.assemble(&submission).unwrap_err();
    assert!(matches!(
        err,
        PredictorError::Validation(ValidationError::MissingField(
            QualifierField::WorkExperience
        ))
    ));

    let mut complete = submission;
    complete.qualifiers.work_experience = Some(18);
    let request = service.assemble(&complete).expect("assembles");
    assert_eq!(request.category, Category::Ews);
    assert_eq!(request.rank, 5_400);
}
