use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{
    create_course, create_semester, id, instances_of, register, seed_planner, test_server,
    ACCESS_DENIED,
};

fn dates(instances: &[Value]) -> Vec<&str> {
    instances
        .iter()
        .map(|i| i["date"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn create_definition_materializes_semester() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;

    assert_eq!(
        planner.definition["generation"],
        json!({ "status": "materialized", "created": 28, "removed": 0 })
    );
    assert_eq!(planner.definition["type"], "Lecture");

    let instances = instances_of(&session, &id(&planner.definition)).await;
    assert_eq!(instances.len(), 28);
    assert_eq!(instances[0]["date"], "2024-09-02T10:00:00");
    assert_eq!(instances[27]["date"], "2024-12-04T10:00:00");

    let first_week = session
        .list(&format!(
            "/api/taskinstances?taskDefinitionId={}&startDate=2024-09-02&endDate=2024-09-04",
            id(&planner.definition)
        ))
        .await;
    assert_eq!(
        dates(&first_week),
        vec!["2024-09-02T10:00:00", "2024-09-04T10:00:00"]
    );
}

#[tokio::test]
async fn update_regenerates_from_today_only() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;
    let definition_id = id(&planner.definition);

    // complete the very first lecture before the schedule moves
    let first = &instances_of(&session, &definition_id).await[0];
    session
        .put(
            &format!("/api/taskinstances/{}/completion", id(first)),
            &json!({ "isCompleted": true }),
        )
        .await
        .assert_status_ok();

    let response = session
        .put(
            &format!("/api/taskdefinitions/{}", definition_id),
            &json!({ "schedule": [{ "dayOfWeek": 2, "startTime": "09:00" }] }),
        )
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(
        updated["generation"],
        json!({ "status": "materialized", "created": 12, "removed": 24 })
    );
    assert_eq!(updated["type"], "Lecture");

    let instances = instances_of(&session, &definition_id).await;
    assert_eq!(instances.len(), 16);
    assert_eq!(
        dates(&instances[..5]),
        vec![
            "2024-09-02T10:00:00",
            "2024-09-04T10:00:00",
            "2024-09-09T10:00:00",
            "2024-09-11T10:00:00",
            "2024-09-17T09:00:00",
        ]
    );
    assert_eq!(instances[0]["isCompleted"], true);
    assert_eq!(instances[15]["date"], "2024-12-03T09:00:00");
}

#[tokio::test]
async fn resync_is_idempotent() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;
    let path = format!("/api/taskdefinitions/{}/resync", id(&planner.definition));

    for _ in 0..2 {
        let response = session.post(&path, &json!({})).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "materialized", "created": 24, "removed": 24 }));
    }

    assert_eq!(instances_of(&session, &id(&planner.definition)).await.len(), 28);
}

#[tokio::test]
async fn invalid_definitions_are_not_persisted() {
    let server = test_server();
    let session = register(&server).await;
    let semester_id = id(&create_semester(&session).await);
    let course_id = id(&create_course(&session, &semester_id, "Algorithms").await);

    let invalid = [
        json!({ "type": "Lecture", "schedule": [{ "dayOfWeek": 7, "startTime": "10:00" }], "courseId": course_id }),
        json!({ "type": "Lecture", "schedule": [{ "dayOfWeek": 1, "startTime": "9am" }], "courseId": course_id }),
        json!({ "type": "Lecture", "schedule": [], "courseId": course_id }),
        json!({ "type": "Party", "schedule": [{ "dayOfWeek": 1, "startTime": "10:00" }], "courseId": course_id }),
    ];
    for body in &invalid {
        session
            .post("/api/taskdefinitions", body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    let definitions = session
        .list(&format!("/api/taskdefinitions?courseId={}", course_id))
        .await;
    assert!(definitions.is_empty());
}

#[tokio::test]
async fn foreign_parents_look_missing() {
    let server = test_server();
    let owner = register(&server).await;
    let stranger = register(&server).await;
    let planner = seed_planner(&owner).await;

    let response = stranger
        .post(
            "/api/taskdefinitions",
            &json!({
                "type": "Lab",
                "schedule": [{ "dayOfWeek": 2, "startTime": "14:00" }],
                "courseId": planner.course_id,
            }),
        )
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], ACCESS_DENIED);

    stranger
        .get(&format!("/api/semesters/{}", planner.semester_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    stranger
        .get(&format!("/api/courses?semesterId={}", planner.semester_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert!(stranger.list("/api/taskinstances").await.is_empty());
}

#[tokio::test]
async fn semester_timeframe_is_locked_by_instances() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;
    let path = format!("/api/semesters/{}", planner.semester_id);

    session
        .put(&path, &json!({ "numberOfWeeks": 15 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let renamed = session.put(&path, &json!({ "name": "Autumn 2024" })).await;
    renamed.assert_status_ok();
    let body: Value = renamed.json();
    assert_eq!(body["name"], "Autumn 2024");
    assert_eq!(body["numberOfWeeks"], 14);
}

#[tokio::test]
async fn semester_length_is_bounded() {
    let server = test_server();
    let session = register(&server).await;

    session
        .post(
            "/api/semesters",
            &json!({ "name": "Forever", "startDate": "2024-09-02", "numberOfWeeks": 20000000 }),
        )
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert!(session.list("/api/semesters").await.is_empty());

    let semester = create_semester(&session).await;
    session
        .put(
            &format!("/api/semesters/{}", id(&semester)),
            &json!({ "numberOfWeeks": 105 }),
        )
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn semester_delete_cascades() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;
    let instance_id = id(&instances_of(&session, &id(&planner.definition)).await[0]);
    let note = session
        .create(
            "/api/notes",
            &json!({ "description": "Master theorem", "taskInstanceId": instance_id }),
        )
        .await;

    session
        .delete(&format!("/api/semesters/{}", planner.semester_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    for path in [
        format!("/api/semesters/{}", planner.semester_id),
        format!("/api/courses/{}", planner.course_id),
        format!("/api/taskdefinitions/{}", id(&planner.definition)),
        format!("/api/taskinstances/{}", instance_id),
        format!("/api/notes/{}", id(&note)),
    ] {
        session.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    }
    assert!(session.list("/api/taskinstances").await.is_empty());
}

#[tokio::test]
async fn manual_instances_respect_slots() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;
    let definition_id = id(&planner.definition);

    session
        .post(
            "/api/taskinstances",
            &json!({ "date": "2024-09-02T10:00:00", "taskDefinitionId": definition_id }),
        )
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let extra = session
        .create(
            "/api/taskinstances",
            &json!({
                "date": "2024-09-03T18:00:00",
                "taskDefinitionId": definition_id,
                "description": "Make-up lecture",
            }),
        )
        .await;
    assert_eq!(extra["isCompleted"], false);
    assert_eq!(instances_of(&session, &definition_id).await.len(), 29);
}

#[tokio::test]
async fn instance_updates_touch_only_mutable_fields() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;
    let instance = instances_of(&session, &id(&planner.definition)).await[2].clone();
    let path = format!("/api/taskinstances/{}", id(&instance));

    session
        .put(&path, &json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    session
        .put(&path, &json!({ "levelOfUnderstanding": 11 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let updated: Value = session
        .put(
            &path,
            &json!({ "levelOfUnderstanding": 7, "description": "Revise proofs" }),
        )
        .await
        .json();
    assert_eq!(updated["levelOfUnderstanding"], 7);
    assert_eq!(updated["description"], "Revise proofs");

    let completed: Value = session
        .put(&format!("{}/completion", path), &json!({ "isCompleted": true }))
        .await
        .json();
    assert_eq!(completed["isCompleted"], true);
    assert_eq!(completed["levelOfUnderstanding"], 7);
    assert_eq!(completed["date"], instance["date"]);
}

#[tokio::test]
async fn instance_delete_removes_notes() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;
    let instance_id = id(&instances_of(&session, &id(&planner.definition)).await[0]);

    session
        .create(
            "/api/notes",
            &json!({ "title": "Recap", "description": "Asymptotics", "taskInstanceId": instance_id }),
        )
        .await;
    let notes = session
        .list(&format!("/api/notes?taskInstanceId={}", instance_id))
        .await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["title"], "Recap");

    session
        .delete(&format!("/api/taskinstances/{}", instance_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    session
        .get(&format!("/api/notes/{}", id(&notes[0])))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notes_need_a_visible_instance() {
    let server = test_server();
    let session = register(&server).await;

    session
        .post(
            "/api/notes",
            &json!({ "description": "Orphan", "taskInstanceId": Uuid::new_v4() }),
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assignment_lifecycle() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;

    let assignment = session
        .create(
            "/api/assignments",
            &json!({
                "title": "Problem set 1",
                "dueDate": "2024-09-20T23:59:00",
                "courseId": planner.course_id,
            }),
        )
        .await;
    assert_eq!(assignment["isCompleted"], false);

    let listed = session
        .list(&format!("/api/assignments?courseId={}", planner.course_id))
        .await;
    assert_eq!(listed.len(), 1);

    let path = format!("/api/assignments/{}", id(&assignment));
    let done: Value = session
        .put(&path, &json!({ "isCompleted": true }))
        .await
        .json();
    assert_eq!(done["isCompleted"], true);
    assert_eq!(done["title"], "Problem set 1");

    session
        .delete(&path)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    session.get(&path).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn definitions_list_by_type_then_description() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;

    for (task_type, description) in [("Lab", "Graphs"), ("Exam", "Midterm"), ("Lab", "Arrays")] {
        session
            .create(
                "/api/taskdefinitions",
                &json!({
                    "type": task_type,
                    "description": description,
                    "schedule": [{ "dayOfWeek": 5, "startTime": "13:00" }],
                    "courseId": planner.course_id,
                }),
            )
            .await;
    }

    let listed = session
        .list(&format!("/api/taskdefinitions?courseId={}", planner.course_id))
        .await;
    let order: Vec<(&str, Option<&str>)> = listed
        .iter()
        .map(|d| (d["type"].as_str().unwrap(), d["description"].as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Exam", Some("Midterm")),
            ("Lab", Some("Arrays")),
            ("Lab", Some("Graphs")),
            ("Lecture", None),
        ]
    );
}
