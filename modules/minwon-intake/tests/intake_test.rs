//! Integration tests for the intake orchestrator.
//! Everything runs against the in-memory store and directory.

use std::sync::Arc;

use minwon_common::config::IntakeOptions;
use minwon_common::{Agency, AgencyType, IntakeError};
use minwon_intake::{
    Attachment, ComplaintPayload, IntakeService, LocationPayload, MemoryAgencyDirectory,
    MemoryComplaintStore, MemoryUploadStore,
};

fn directory() -> Arc<MemoryAgencyDirectory> {
    Arc::new(MemoryAgencyDirectory::new(vec![
        Agency {
            agency_no: 1,
            agency_name: "서울특별시".to_string(),
            region_code: Some("11".to_string()),
            agency_type: AgencyType::Regional,
        },
        Agency {
            agency_no: 5,
            agency_name: "환경부".to_string(),
            region_code: None,
            agency_type: AgencyType::National,
        },
    ]))
}

fn service(
    store: Arc<MemoryComplaintStore>,
) -> IntakeService<Arc<MemoryComplaintStore>, Arc<MemoryAgencyDirectory>> {
    IntakeService::new(store, directory(), IntakeOptions::default())
}

fn seoul_payload() -> ComplaintPayload {
    serde_json::from_str(
        r#"{
            "title": "pothole",
            "content": "도로에 깊은 포트홀이 있습니다",
            "location": {
                "address": "서울특별시 강남구 테헤란로 123",
                "lat": "37.5",
                "lng": "127.0"
            },
            "agencyCode": "5"
        }"#,
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// The full flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn classifier_and_jurisdiction_give_two_ordered_associations() {
    let store = Arc::new(MemoryComplaintStore::new());
    let svc = service(store.clone());

    let complaint_no = svc.create_complaint(seoul_payload(), 7, None).await.unwrap();

    let complaints = store.complaints();
    assert_eq!(complaints.len(), 1);
    let row = &complaints[0].complaint;
    assert_eq!(complaints[0].complaint_no, complaint_no);
    assert_eq!(row.status.as_str(), "UNPROCESSED");
    assert_eq!(row.user_no, 7);
    assert_eq!(row.agency_no, Some(5));
    assert_eq!(row.latitude, Some(37.5));
    assert_eq!(row.longitude, Some(127.0));
    assert_eq!(row.address.as_deref(), Some("서울특별시 강남구 테헤란로 123"));

    let features = store.features();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].complaint_no, complaint_no);
    assert_eq!(features[0].feature.feature_type, "POINT");
    assert_eq!(features[0].feature.geom.x, 127.0);
    assert_eq!(features[0].feature.geom.y, 37.5);
    assert_eq!(features[0].feature.geom.ewkt(), "SRID=4326;POINT(127 37.5)");
    assert_eq!(
        features[0].feature.addr_text.as_deref(),
        Some("서울특별시 강남구 테헤란로 123")
    );

    // Classification first, jurisdiction second.
    assert_eq!(
        store.associations(),
        vec![(complaint_no, 5), (complaint_no, 1)]
    );
}

#[tokio::test]
async fn matching_tiers_collapse_to_one_association() {
    let store = Arc::new(MemoryComplaintStore::new());
    let svc = service(store.clone());

    let mut payload = seoul_payload();
    payload.agency_code = Some(1i64.into());
    let complaint_no = svc.create_complaint(payload, 7, None).await.unwrap();

    assert_eq!(store.associations(), vec![(complaint_no, 1)]);
}

#[tokio::test]
async fn jurisdiction_tier_runs_alone_without_classifier_hint() {
    let store = Arc::new(MemoryComplaintStore::new());
    let svc = service(store.clone());

    let mut payload = seoul_payload();
    payload.agency_code = None;
    let complaint_no = svc.create_complaint(payload, 7, None).await.unwrap();

    assert_eq!(store.complaints()[0].complaint.agency_no, None);
    assert_eq!(store.associations(), vec![(complaint_no, 1)]);
}

#[tokio::test]
async fn unknown_region_yields_no_jurisdiction_association() {
    let store = Arc::new(MemoryComplaintStore::new());
    let svc = service(store.clone());

    let payload = ComplaintPayload::new("street light", "가로등이 꺼져 있습니다").with_location(
        LocationPayload {
            address: Some("제주도 서귀포시 중문동".to_string()),
            lat: None,
            lng: None,
        },
    );
    svc.create_complaint(payload, 7, None).await.unwrap();

    assert!(store.associations().is_empty());
    assert_eq!(store.complaints().len(), 1);
}

// ---------------------------------------------------------------------------
// Failure isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_latitude_drops_feature_but_not_complaint() {
    let store = Arc::new(MemoryComplaintStore::new());
    let svc = service(store.clone());

    let mut payload = seoul_payload();
    payload.location.as_mut().unwrap().lat = Some("abc".into());
    let complaint_no = svc.create_complaint(payload, 7, None).await.unwrap();

    assert!(store.features().is_empty());
    let row = &store.complaints()[0].complaint;
    // The pair invariant: neither ordinate lands on the row.
    assert_eq!(row.latitude, None);
    assert_eq!(row.longitude, None);
    // Resolution is unaffected.
    assert_eq!(
        store.associations(),
        vec![(complaint_no, 5), (complaint_no, 1)]
    );
}

#[tokio::test]
async fn lone_latitude_is_ignored() {
    let store = Arc::new(MemoryComplaintStore::new());
    let svc = service(store.clone());

    let payload = ComplaintPayload::new("noise", "공사 소음").with_location(LocationPayload {
        address: None,
        lat: Some(37.5.into()),
        lng: None,
    });
    svc.create_complaint(payload, 7, None).await.unwrap();

    assert!(store.features().is_empty());
    let row = &store.complaints()[0].complaint;
    assert_eq!(row.latitude, None);
    assert_eq!(row.longitude, None);
}

#[tokio::test]
async fn feature_insert_failure_is_absorbed() {
    let store = Arc::new(MemoryComplaintStore::new());
    store.fail_feature_inserts();
    let svc = service(store.clone());

    let complaint_no = svc.create_complaint(seoul_payload(), 7, None).await.unwrap();

    assert!(store.features().is_empty());
    assert_eq!(
        store.associations(),
        vec![(complaint_no, 5), (complaint_no, 1)]
    );
}

#[tokio::test]
async fn association_insert_failure_is_absorbed() {
    let store = Arc::new(MemoryComplaintStore::new());
    store.fail_association_inserts();
    let svc = service(store.clone());

    svc.create_complaint(seoul_payload(), 7, None).await.unwrap();

    assert!(store.associations().is_empty());
    assert_eq!(store.complaints().len(), 1);
}

#[tokio::test]
async fn complaint_insert_failure_is_fatal() {
    let store = Arc::new(MemoryComplaintStore::new());
    store.fail_complaint_inserts();
    let svc = service(store.clone());

    let err = svc.create_complaint(seoul_payload(), 7, None).await.unwrap_err();
    assert!(matches!(err, IntakeError::Storage(_)));
    assert!(store.features().is_empty());
    assert!(store.associations().is_empty());
}

#[tokio::test]
async fn missing_title_rejects_before_any_write() {
    let store = Arc::new(MemoryComplaintStore::new());
    let svc = service(store.clone());

    let err = svc
        .create_complaint(ComplaintPayload::new("", "본문"), 7, None)
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::MissingField { field: "title" }));
    assert!(store.complaints().is_empty());
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_result_becomes_the_image_reference() {
    let store = Arc::new(MemoryComplaintStore::new());
    let uploader = Arc::new(MemoryUploadStore::new("/uploads"));
    let svc = service(store.clone()).with_uploader(uploader.clone());

    let attachment = Attachment {
        file_name: "pothole.jpg".to_string(),
        bytes: vec![0xff, 0xd8],
    };
    svc.create_complaint(seoul_payload(), 7, Some(attachment))
        .await
        .unwrap();

    assert_eq!(
        store.complaints()[0].complaint.image_path.as_deref(),
        Some("/uploads/pothole.jpg")
    );
    assert_eq!(uploader.stored(), vec!["/uploads/pothole.jpg".to_string()]);
}

#[tokio::test]
async fn upload_failure_keeps_the_payload_image_reference() {
    let store = Arc::new(MemoryComplaintStore::new());
    let uploader = Arc::new(MemoryUploadStore::new("/uploads"));
    uploader.fail_uploads();
    let svc = service(store.clone()).with_uploader(uploader);

    let mut payload = seoul_payload();
    payload.image_path = Some("/uploads/previous.jpg".to_string());
    let attachment = Attachment {
        file_name: "pothole.jpg".to_string(),
        bytes: vec![0xff, 0xd8],
    };
    svc.create_complaint(payload, 7, Some(attachment)).await.unwrap();

    // Complaint still created, image reference falls back to the payload one.
    assert_eq!(
        store.complaints()[0].complaint.image_path.as_deref(),
        Some("/uploads/previous.jpg")
    );
}

// ---------------------------------------------------------------------------
// Payload handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_hint_in_payload_is_ignored() {
    let store = Arc::new(MemoryComplaintStore::new());
    let svc = service(store.clone());

    let payload: ComplaintPayload = serde_json::from_str(
        r#"{"title":"t","content":"c","status":"COMPLETED"}"#,
    )
    .unwrap();
    svc.create_complaint(payload, 7, None).await.unwrap();

    assert_eq!(store.complaints()[0].complaint.status.as_str(), "UNPROCESSED");
}

#[tokio::test]
async fn classifier_name_is_used_when_code_is_absent() {
    let store = Arc::new(MemoryComplaintStore::new());
    let svc = service(store.clone());

    let payload: ComplaintPayload = serde_json::from_str(
        r#"{"title":"t","content":"c","agency_name":"환경부"}"#,
    )
    .unwrap();
    let complaint_no = svc.create_complaint(payload, 7, None).await.unwrap();

    assert_eq!(store.complaints()[0].complaint.agency_no, Some(5));
    assert_eq!(store.associations(), vec![(complaint_no, 5)]);
}

#[tokio::test]
async fn name_fallback_disabled_leaves_classifier_tier_empty() {
    let store = Arc::new(MemoryComplaintStore::new());
    let svc = IntakeService::new(
        store.clone(),
        directory(),
        IntakeOptions {
            agency_name_fallback: false,
            ..IntakeOptions::default()
        },
    );

    let payload = ComplaintPayload::new("t", "c").with_agency_name("환경부");
    svc.create_complaint(payload, 7, None).await.unwrap();

    assert_eq!(store.complaints()[0].complaint.agency_no, None);
    assert!(store.associations().is_empty());
}
