mod common;

use common::{BrokenSource, ScriptedBackend, answer, call, stopped, tool_use};
use runtime::projection::Chart;
use runtime::{
    Error, FALLBACK_ANSWER, FixtureSource, LoopConfig, ModelError, Orchestrator, Part, Session,
    StopReason, Termination, ToolExecutor, Turn, project,
};
use serde_json::json;

fn agent(backend: ScriptedBackend) -> Orchestrator<ScriptedBackend, ToolExecutor<FixtureSource>> {
    Orchestrator::new(backend, ToolExecutor::new(FixtureSource), LoopConfig::default()).unwrap()
}

fn snapshot(session: &Session) -> String {
    serde_json::to_string(session.conversation()).unwrap()
}

#[tokio::test]
async fn funnel_question_projects_ordered_stages() {
    let backend = ScriptedBackend::ok([
        call("toolu_1", "get_conversion_funnel"),
        answer("1,245 leads became 28 closed-won deals."),
    ]);
    let agent = agent(backend);
    let mut session = Session::new();

    let result = agent.run(&mut session, "show the conversion funnel").await.unwrap();

    assert_eq!(result.termination, Termination::Completed);
    assert_eq!(result.round_trips, 1);
    assert_eq!(result.final_answer, "1,245 leads became 28 closed-won deals.");
    assert_eq!(result.tool_calls_made, ["get_conversion_funnel"]);

    let tool = result.last_tool.unwrap();
    assert_eq!(tool.payload["row_count"], 5);
    let projection = project(&tool.tool_name, &tool.payload);
    let funnels: Vec<_> = projection
        .charts
        .iter()
        .filter_map(|(_, d)| match &d.chart {
            Chart::Funnel { stages } => Some(stages),
            _ => None,
        })
        .collect();
    assert_eq!(funnels.len(), 1);
    let labels: Vec<&str> = funnels[0].iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["Leads", "MQLs", "SQLs", "Opportunities", "Closed Won"]);
}

#[tokio::test]
async fn sequential_tools_report_last_payload() {
    let backend = ScriptedBackend::ok([
        call("toolu_1", "get_intent_signals"),
        tool_use(&[(
            "toolu_2",
            "get_account_360_view",
            json!({ "account_name": "Goldman Sachs" }),
        )]),
        answer("Goldman Sachs is in the decision stage."),
    ]);
    let agent = agent(backend);
    let mut session = Session::new();

    let result = agent.run(&mut session, "who is most engaged?").await.unwrap();

    assert_eq!(result.round_trips, 2);
    assert_eq!(
        result.tool_calls_made,
        ["get_intent_signals", "get_account_360_view"]
    );
    let tool = result.last_tool.unwrap();
    assert_eq!(tool.tool_name, "get_account_360_view");
    assert!(tool.payload.get("comparison").is_some());
    assert_eq!(agent.backend().calls(), 3);
}

#[tokio::test]
async fn requested_account_identity_is_echoed() {
    let backend = ScriptedBackend::ok([
        tool_use(&[(
            "toolu_1",
            "get_account_360_view",
            json!({ "account_name": "Acme Corp" }),
        )]),
        answer("Acme Corp overview."),
    ]);
    let agent = agent(backend);
    let mut session = Session::new();

    let result = agent.run(&mut session, "360 view of Acme Corp").await.unwrap();

    let payload = result.last_tool.unwrap().payload;
    assert_eq!(payload["data"][0]["account_name"], "Acme Corp");
}

#[tokio::test]
async fn iteration_limit_stops_the_loop() {
    let tools = [
        "get_b2b_marketing_summary",
        "get_lead_metrics",
        "get_conversion_funnel",
        "get_campaign_performance",
        "get_paid_media_performance",
        "get_email_engagement",
        "get_intent_signals",
        "get_accounts_to_reach_out",
    ];
    let mut script: Vec<_> = tools
        .iter()
        .enumerate()
        .map(|(i, name)| call(&format!("toolu_{i}"), name))
        .collect();
    script.push(call("toolu_8", "get_pipeline_metrics"));
    let agent = agent(ScriptedBackend::ok(script));
    let mut session = Session::new();

    let result = agent.run(&mut session, "tell me everything").await.unwrap();

    assert_eq!(result.termination, Termination::IterationLimitExceeded);
    assert_eq!(result.final_answer, FALLBACK_ANSWER);
    assert_eq!(result.tool_calls_made, tools);
    assert_eq!(result.round_trips, 8);
    assert_eq!(agent.backend().calls(), 9);

    // The unanswered ninth request is not recorded.
    let turns = session.conversation().turns();
    assert_eq!(turns.len(), 1 + 8 * 2 + 1);
    assert_eq!(turns.last(), Some(&Turn::assistant_text(FALLBACK_ANSWER)));
}

#[tokio::test]
async fn lower_limit_is_respected() {
    let script = (0..10).map(|i| call(&format!("toolu_{i}"), "get_lead_metrics"));
    let config = LoopConfig {
        max_round_trips: 5,
        ..Default::default()
    };
    let agent = Orchestrator::new(
        ScriptedBackend::ok(script),
        ToolExecutor::new(FixtureSource),
        config,
    )
    .unwrap();
    let mut session = Session::new();

    let result = agent.run(&mut session, "loop").await.unwrap();

    assert_eq!(result.round_trips, 5);
    assert_eq!(result.tool_calls_made.len(), 5);
    assert_eq!(agent.backend().calls(), 6);
}

#[test]
fn out_of_range_limit_rejected() {
    let config = LoopConfig {
        max_round_trips: 12,
        ..Default::default()
    };
    let err = Orchestrator::new(
        ScriptedBackend::default(),
        ToolExecutor::new(FixtureSource),
        config,
    )
    .err()
    .unwrap();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn data_failure_becomes_error_result() {
    let backend = ScriptedBackend::ok([
        call("toolu_1", "get_lead_metrics"),
        answer("The lead data is unavailable right now."),
    ]);
    let agent = Orchestrator::new(
        backend,
        ToolExecutor::new(BrokenSource),
        LoopConfig::default(),
    )
    .unwrap();
    let mut session = Session::new();

    let result = agent.run(&mut session, "lead metrics").await.unwrap();

    assert_eq!(result.termination, Termination::Completed);
    assert_eq!(result.tool_calls_made, ["get_lead_metrics"]);
    assert!(result.last_tool.is_none());

    let second = &agent.backend().requests()[1];
    let Some(Turn::ToolResults { results }) = second.cycle.last() else {
        panic!("expected tool results before the second model call");
    };
    assert!(results[0].is_error);
    assert_eq!(results[0].payload["data"], json!([]));
    assert_eq!(
        results[0].message(),
        Some("data source unavailable: warehouse offline")
    );
}

#[tokio::test]
async fn every_call_answered_before_next_request() {
    let backend = ScriptedBackend::ok([
        tool_use(&[
            ("a", "get_intent_signals", json!({ "segment": "DCIO" })),
            ("b", "get_weather", json!({})),
            ("c", "get_account_360_view", json!({})),
        ]),
        answer("done"),
    ]);
    let agent = agent(backend);
    let mut session = Session::new();

    let result = agent.run(&mut session, "mixed").await.unwrap();
    assert_eq!(
        result.tool_calls_made,
        ["get_intent_signals", "get_weather", "get_account_360_view"]
    );
    // The last successful result wins, even though later calls failed.
    assert_eq!(result.last_tool.unwrap().tool_name, "get_intent_signals");

    let second = &agent.backend().requests()[1];
    let [Turn::User { .. }, Turn::Assistant { parts }, Turn::ToolResults { results }] =
        second.cycle.as_slice()
    else {
        panic!("unexpected cycle shape: {:?}", second.cycle);
    };
    let call_ids: Vec<_> = parts
        .iter()
        .filter_map(|p| match p {
            Part::ToolCall(c) => Some(c.id.as_str()),
            Part::Text { .. } => None,
        })
        .collect();
    let result_ids: Vec<_> = results.iter().map(|r| r.invocation_id.as_str()).collect();
    assert_eq!(call_ids, result_ids);
    assert_eq!(
        results.iter().map(|r| r.is_error).collect::<Vec<_>>(),
        [false, true, true]
    );
}

#[tokio::test]
async fn failed_cycle_leaves_session_untouched() {
    let backend = ScriptedBackend::new([
        Ok(answer("Hello.")),
        Ok(call("toolu_1", "get_lead_metrics")),
        Err(ModelError::Api {
            status: 500,
            message: "overloaded".into(),
        }),
    ]);
    let agent = agent(backend);
    let mut session = Session::new();
    agent.run(&mut session, "hi").await.unwrap();

    let conversation = snapshot(&session);
    let context = session.context_note().map(str::to_string);
    let stats = session.stats().clone();

    let err = agent.run(&mut session, "lead metrics").await.unwrap_err();

    assert!(matches!(err, Error::Model(ModelError::Api { status: 500, .. })));
    assert!(!err.is_retryable());
    assert_eq!(snapshot(&session), conversation);
    assert_eq!(session.context_note().map(str::to_string), context);
    assert_eq!(session.stats(), &stats);
}

#[tokio::test]
async fn auth_and_rate_limit_errors_surface() {
    let agent = agent(ScriptedBackend::new([
        Err(ModelError::Auth("invalid x-api-key".into())),
        Err(ModelError::RateLimited { retry_after: None }),
    ]));
    let mut session = Session::new();

    let err = agent.run(&mut session, "hi").await.unwrap_err();
    assert!(err.is_auth());
    let err = agent.run(&mut session, "hi").await.unwrap_err();
    assert!(err.is_retryable());
    assert!(session.conversation().is_empty());
}

#[tokio::test]
async fn follow_up_question_sees_previous_cycle() {
    let backend = ScriptedBackend::ok([
        call("toolu_1", "get_conversion_funnel"),
        answer("Funnel shown."),
        answer("MQL to SQL is the biggest drop."),
    ]);
    let agent = agent(backend);
    let mut session = Session::new();

    agent.run(&mut session, "show the conversion funnel").await.unwrap();
    let first_cycle = session.conversation().turns().to_vec();
    agent.run(&mut session, "where is the biggest drop?").await.unwrap();

    let requests = agent.backend().requests();
    let second = &requests[2];
    assert_eq!(second.history, first_cycle);
    assert_eq!(second.cycle, [Turn::user("where is the biggest drop?")]);
    assert!(
        second
            .system
            .as_deref()
            .unwrap()
            .ends_with("Context: Last: 'show the conversion funnel' using 'get_conversion_funnel'")
    );
    assert!(requests[0].system.as_deref().unwrap().find("Context:").is_none());
    assert_eq!(second.tools.len(), 16);
}

#[tokio::test]
async fn history_window_starts_at_a_question() {
    let backend = ScriptedBackend::ok([
        call("toolu_1", "get_lead_metrics"),
        answer("a1"),
        answer("a2"),
        answer("a3"),
    ]);
    let config = LoopConfig {
        window_turns: 3,
        ..Default::default()
    };
    let agent = Orchestrator::new(backend, ToolExecutor::new(FixtureSource), config).unwrap();
    let mut session = Session::new();

    agent.run(&mut session, "q1").await.unwrap();
    agent.run(&mut session, "q2").await.unwrap();
    agent.run(&mut session, "q3").await.unwrap();

    let requests = agent.backend().requests();
    // q1's cycle has four turns; its last three start mid-cycle.
    assert!(requests[2].history.is_empty());
    assert_eq!(
        requests[3].history,
        [Turn::user("q2"), Turn::assistant_text("a2")]
    );
    assert!(requests.iter().all(|r| r.turns()[0].is_user()));
}

#[tokio::test]
async fn truncated_answer_is_incomplete() {
    let agent = agent(ScriptedBackend::ok([stopped(
        "The top accounts are",
        StopReason::MaxTokens,
    )]));
    let mut session = Session::new();

    let result = agent.run(&mut session, "top accounts").await.unwrap();

    assert_eq!(
        result.termination,
        Termination::Incomplete(StopReason::MaxTokens)
    );
    assert_eq!(result.final_answer, "The top accounts are");
    assert_eq!(session.conversation().len(), 2);
}

#[tokio::test]
async fn empty_answer_uses_fallback() {
    let agent = agent(ScriptedBackend::ok([
        stopped("", StopReason::ToolUse),
        answer("unused"),
    ]));
    let mut session = Session::new();

    let result = agent.run(&mut session, "?").await.unwrap();

    assert_eq!(result.termination, Termination::Completed);
    assert_eq!(result.final_answer, FALLBACK_ANSWER);
    assert_eq!(agent.backend().calls(), 1);
}

#[tokio::test]
async fn stats_and_usage_accumulate() {
    let backend = ScriptedBackend::ok([
        call("toolu_1", "get_pages_to_sunset"),
        answer("Three pages."),
        call("toolu_2", "get_high_bounce_pages"),
        answer("Landing pages bounce most."),
    ]);
    let agent = agent(backend);
    let mut session = Session::new();

    let first = agent.run(&mut session, "pages to sunset").await.unwrap();
    agent.run(&mut session, "high bounce pages").await.unwrap();

    assert_eq!(first.usage.total_tokens(), 30);
    let stats = session.stats();
    assert_eq!(stats.queries, 2);
    assert!(stats.tools_used.contains("get_pages_to_sunset"));
    assert!(stats.tools_used.contains("get_high_bounce_pages"));
}

#[tokio::test]
async fn reset_clears_history_but_keeps_stats() {
    let agent = agent(ScriptedBackend::ok([answer("one"), answer("two")]));
    let mut session = Session::new();

    agent.run(&mut session, "first").await.unwrap();
    session.reset();
    agent.run(&mut session, "second").await.unwrap();

    assert!(agent.backend().requests()[1].history.is_empty());
    assert_eq!(session.stats().queries, 2);
}
