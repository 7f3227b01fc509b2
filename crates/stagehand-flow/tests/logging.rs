//! Runtime instrumentation of compiled flows.

use std::cell::RefCell;
use std::io::Write;
use std::sync::{Arc, Mutex};

use stagehand_config::{LogLevel, ScheduleConfig};
use stagehand_flow::{FlowBuilder, action, milestone};
use stagehand_graph::reference;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
  fn contents(&self) -> String {
    String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
  }
}

impl Write for Capture {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

impl<'a> MakeWriter<'a> for Capture {
  type Writer = Capture;

  fn make_writer(&'a self) -> Self::Writer {
    self.clone()
  }
}

/// Run `f` with a subscriber capturing events up to `max`.
fn captured(max: Level, f: impl FnOnce()) -> String {
  let capture = Capture::default();
  let subscriber = tracing_subscriber::fmt()
    .with_writer(capture.clone())
    .with_max_level(max)
    .with_ansi(false)
    .without_time()
    .with_target(false)
    .finish();
  tracing::subscriber::with_default(subscriber, f);
  capture.contents()
}

thread_local! {
  static ACTUAL: RefCell<String> = const { RefCell::new(String::new()) };
}

fn wake() {
  ACTUAL.with(|a| a.borrow_mut().push_str("wake "));
}

fn coffee() {
  ACTUAL.with(|a| a.borrow_mut().push_str("coffee "));
}

/// `(level, event)` pairs for every step event in `output`.
fn leveled_events(output: &str) -> Vec<(&str, &str)> {
  output
    .lines()
    .filter(|line| line.contains("flow."))
    .filter_map(|line| {
      let mut words = line.split_whitespace();
      Some((words.next()?, words.next()?))
    })
    .collect()
}

fn event_lines(output: &str) -> Vec<&str> {
  output
    .lines()
    .filter_map(|line| line.find("flow.").map(|at| &line[at..]))
    .filter_map(|rest| rest.split_whitespace().next())
    .collect()
}

#[test]
fn test_named_flow_logs_every_step() {
  let flow = FlowBuilder::named("morning")
    .add(action("wake", wake) >> milestone("awake") >> action("coffee", coffee))
    .build()
    .unwrap();

  let output = captured(Level::TRACE, || flow.run());
  assert_eq!(
    event_lines(&output),
    vec![
      "flow.start(morning)",
      "flow.action(wake)",
      "flow.milestone(awake)",
      "flow.action(coffee)",
      "flow.end(morning)",
    ]
  );
  assert!(output.contains("TRACE"));
  assert_eq!(ACTUAL.with(|a| a.borrow().clone()), "wake coffee ");
}

#[test]
fn test_unnamed_flow_is_silent() {
  let flow = FlowBuilder::new()
    .add(action("wake", wake) >> action("coffee", coffee))
    .build()
    .unwrap();

  let output = captured(Level::TRACE, || flow.run());
  assert!(event_lines(&output).is_empty());
}

#[test]
fn test_configured_level_is_used() {
  let config = ScheduleConfig {
    name: Some("morning".to_string()),
    log_level: LogLevel::Debug,
    ..Default::default()
  };
  let flow = FlowBuilder::new()
    .with_config(&config)
    .add(action("wake", wake))
    .build()
    .unwrap();

  let output = captured(Level::INFO, || flow.run());
  assert!(event_lines(&output).is_empty());

  let output = captured(Level::DEBUG, || flow.run());
  assert_eq!(event_lines(&output).len(), 3);
  assert!(output.contains("DEBUG"));
}

#[test]
fn test_milestone_override_beats_schedule_level() {
  let mut config = ScheduleConfig {
    name: Some("morning".to_string()),
    ..Default::default()
  };
  config.levels.insert("morning".to_string(), LogLevel::Debug);
  config.levels.insert("awake".to_string(), LogLevel::Warn);
  let flow = FlowBuilder::new()
    .with_config(&config)
    .add(action("wake", wake) >> milestone("awake"))
    .build()
    .unwrap();

  let output = captured(Level::TRACE, || flow.run());
  assert_eq!(
    leveled_events(&output),
    vec![
      ("DEBUG", "flow.start(morning)"),
      ("DEBUG", "flow.action(wake)"),
      ("WARN", "flow.milestone(awake)"),
      ("DEBUG", "flow.end(morning)"),
    ]
  );

  let output = captured(Level::WARN, || flow.run());
  assert_eq!(event_lines(&output), vec!["flow.milestone(awake)"]);
}

#[test]
fn test_unmet_condition_is_not_logged() {
  fn never() -> bool {
    false
  }

  let flow = FlowBuilder::named("morning")
    .add(action("wake", wake))
    .add((reference("wake") >> action("coffee", coffee)).when("weekday", never))
    .build()
    .unwrap();

  let output = captured(Level::TRACE, || flow.run());
  assert_eq!(
    event_lines(&output),
    vec!["flow.start(morning)", "flow.action(wake)", "flow.end(morning)"]
  );
}
