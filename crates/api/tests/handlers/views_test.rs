use axum::http::StatusCode;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{create_course, id, instances_of, register, seed_planner, test_server, Session};

async fn complete(session: &Session<'_>, instance: &Value) {
    session
        .put(
            &format!("/api/taskinstances/{}/completion", id(instance)),
            &json!({ "isCompleted": true }),
        )
        .await
        .assert_status_ok();
}

fn field<'a>(items: &'a [Value], name: &str) -> Vec<&'a str> {
    items.iter().map(|i| i[name].as_str().unwrap()).collect()
}

#[tokio::test]
async fn daily_defaults_to_today() {
    let server = test_server();
    let session = register(&server).await;
    seed_planner(&session).await;

    let today = session.list("/api/views/daily").await;

    assert_eq!(today.len(), 1);
    assert_eq!(today[0]["date"], "2024-09-16T10:00:00");
    assert_eq!(today[0]["isMissed"], false);
    assert_eq!(today[0]["taskDefinition"]["type"], "Lecture");
    assert_eq!(today[0]["course"]["name"], "Algorithms");
    assert_eq!(today[0]["course"]["color"], "#cccccc");
}

#[tokio::test]
async fn past_days_are_missed_until_completed() {
    let server = test_server();
    let session = register(&server).await;
    seed_planner(&session).await;

    let before = session.list("/api/views/daily?date=2024-09-11").await;
    assert_eq!(before.len(), 1);
    assert_eq!(before[0]["isMissed"], true);

    complete(&session, &before[0]).await;

    let after = session.list("/api/views/daily?date=2024-09-11").await;
    assert_eq!(after[0]["isMissed"], false);
    assert_eq!(after[0]["isCompleted"], true);
}

#[tokio::test]
async fn weekly_defaults_to_current_week() {
    let server = test_server();
    let session = register(&server).await;
    seed_planner(&session).await;

    let current = session.list("/api/views/weekly").await;
    assert_eq!(current.len(), 1);
    assert_eq!(current[0]["courseName"], "Algorithms");
    assert_eq!(
        field(current[0]["instances"].as_array().unwrap(), "date"),
        vec!["2024-09-16T10:00:00", "2024-09-18T10:00:00"]
    );

    let first = session.list("/api/views/weekly?weekStartDate=2024-09-01").await;
    let instances = first[0]["instances"].as_array().unwrap();
    assert_eq!(
        field(instances, "date"),
        vec!["2024-09-02T10:00:00", "2024-09-04T10:00:00"]
    );
    assert!(instances.iter().all(|i| i["isMissed"] == true));
}

#[tokio::test]
async fn malformed_dates_are_rejected() {
    let server = test_server();
    let session = register(&server).await;

    for path in [
        "/api/views/daily?date=16/09/2024",
        "/api/views/weekly?weekStartDate=soon",
        "/api/taskinstances?endDate=2024-02-30",
    ] {
        session
            .get(path)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn dates_at_the_end_of_the_calendar_are_rejected() {
    let server = test_server();
    let session = register(&server).await;
    let last = NaiveDate::MAX.to_string().replace('+', "%2B");

    for path in [
        format!("/api/views/daily?date={}", last),
        format!("/api/views/weekly?weekStartDate={}", last),
        format!("/api/taskinstances?endDate={}", last),
    ] {
        session
            .get(&path)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn semester_grid_covers_every_course() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;
    create_course(&session, &planner.semester_id, "Networks").await;

    let response = session
        .get(&format!("/api/views/semester?semesterId={}", planner.semester_id))
        .await;
    response.assert_status_ok();
    let view: Value = response.json();

    assert_eq!(view["semesterName"], "Fall 2024");
    assert_eq!(view["currentWeekIndex"], 2);
    let courses = view["courses"].as_array().unwrap();
    assert_eq!(field(courses, "courseName"), vec!["Algorithms", "Networks"]);
    assert!(courses[1]["rows"].as_array().unwrap().is_empty());

    let weeks = courses[0]["rows"][0]["weeks"].as_array().unwrap();
    assert_eq!(weeks.len(), 14);
    assert!(weeks.iter().all(|w| w.as_array().unwrap().len() == 2));
    assert_eq!(weeks[0][0]["isMissed"], true);
    assert_eq!(weeks[2][0]["isMissed"], false);
    assert_eq!(weeks[13][1]["date"], "2024-12-04T10:00:00");
}

#[tokio::test]
async fn semester_grid_for_unknown_semester() {
    let server = test_server();
    let session = register(&server).await;

    session
        .get(&format!("/api/views/semester?semesterId={}", Uuid::new_v4()))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    session
        .get("/api/views/semester?semesterId=fall")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gaps_list_incomplete_past_instances() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;

    let gaps = session.list("/api/views/gaps").await;
    assert_eq!(
        field(&gaps, "date"),
        vec![
            "2024-09-02T10:00:00",
            "2024-09-04T10:00:00",
            "2024-09-09T10:00:00",
            "2024-09-11T10:00:00",
        ]
    );

    let instances = instances_of(&session, &id(&planner.definition)).await;
    complete(&session, &instances[1]).await;
    assert_eq!(session.list("/api/views/gaps").await.len(), 3);

    let last_week = session.list("/api/views/gaps?lookbackWeeks=1").await;
    assert_eq!(
        field(&last_week, "date"),
        vec!["2024-09-09T10:00:00", "2024-09-11T10:00:00"]
    );

    for path in ["/api/views/gaps?lookbackWeeks=0", "/api/views/gaps?lookbackWeeks=abc"] {
        session
            .get(path)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn upcoming_assignments_window() {
    let server = test_server();
    let session = register(&server).await;
    let planner = seed_planner(&session).await;

    for (title, due) in [
        ("Project", "2024-09-24T00:00:00"),
        ("Old", "2024-09-10T12:00:00"),
        ("Problem set 1", "2024-09-23T23:59:00"),
        ("Quiz", "2024-09-16T08:00:00"),
    ] {
        session
            .create(
                "/api/assignments",
                &json!({ "title": title, "dueDate": due, "courseId": planner.course_id }),
            )
            .await;
    }

    let week = session.list("/api/views/upcoming").await;
    assert_eq!(field(&week, "title"), vec!["Quiz", "Problem set 1"]);
    assert_eq!(week[0]["course"]["name"], "Algorithms");

    let longer = session.list("/api/views/upcoming?daysAhead=8").await;
    assert_eq!(
        field(&longer, "title"),
        vec!["Quiz", "Problem set 1", "Project"]
    );

    session
        .get("/api/views/upcoming?daysAhead=-1")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
