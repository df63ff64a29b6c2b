use tracing::debug;

use super::ScanTask;
use crate::{
	buffer::{Buffer, FilterSet, attrs::FILTER_MATCH},
	error::Result,
	event::Topic,
};

/// Selects the lines matching the buffer's filter set into its filtered
/// view.
#[derive(Debug, Default)]
pub struct FilterTask {
	snapshot: FilterSet,
	cursor:   usize,
	progress: u8,
}

impl FilterTask {
	pub fn new() -> Self { Self::default() }

	pub fn cursor(&self) -> usize { self.cursor }

	fn publish_progress(&mut self, buffer: &Buffer) {
		let len = buffer.len().max(1);
		let percent = (self.cursor.min(len) * 100 / len) as u8 / 5 * 5;
		if percent != self.progress {
			self.progress = percent;
			buffer.set_filter_progress(percent);
			buffer.notify(Topic::Buffer);
		}
	}
}

impl ScanTask for FilterTask {
	const NAME: &'static str = "filter";

	fn rearm(&mut self, buffer: &Buffer) {
		buffer.filtered().clear();
		buffer.filter_attrs().clear();
		self.cursor = 0;
		self.snapshot = buffer.filter_snapshot();
		// Nothing to scan in an empty buffer: the scan is already complete.
		self.progress = if buffer.len() == 0 { 100 } else { 0 };
		buffer.set_filter_progress(self.progress);
		debug!("filter rearmed with [{}]", self.snapshot);
		buffer.notify(Topic::Buffer);
	}

	fn is_idle(&self, buffer: &Buffer) -> bool { self.snapshot.is_empty() || self.cursor >= buffer.len() }

	fn step(&mut self, buffer: &Buffer) -> Result<()> {
		if let Some(line) = buffer.lines().line(self.cursor)
			&& let Some(span) = self.snapshot.matches(line)
		{
			buffer.filtered().add_line(self.cursor)?;
			buffer.filter_attrs().set(self.cursor, FILTER_MATCH, span);
		}
		self.cursor += 1;
		self.publish_progress(buffer);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::FilterTask;
	use crate::{
		buffer::{Combine, Pattern},
		engine::{
			Processor, ScanTask,
			testing::{buffer, wait_until},
		},
		error::Error,
		event::Topic,
	};

	fn run_to_end(task: &mut FilterTask, buffer: &crate::buffer::Buffer) {
		while !task.is_idle(buffer) {
			task.step(buffer).expect("filter step");
		}
	}

	#[test]
	fn and_filter_should_select_only_lines_with_every_pattern() {
		let (buffer, _) = buffer(&["foo bar", "foo", "bar baz"]);
		buffer.filter_set().push(Pattern::new("foo").expect("valid"));
		buffer.filter_set().push(Pattern::new("bar").expect("valid"));

		let mut task = FilterTask::new();
		task.rearm(&buffer);
		run_to_end(&mut task, &buffer);
		assert_eq!(buffer.filtered().to_vec(), vec![0]);
		assert_eq!(buffer.filter_attrs().get(0).map(|attr| (attr.start, attr.end)), Some((0, 3)));

		buffer.filter_set().set_combine(Combine::Or);
		task.rearm(&buffer);
		run_to_end(&mut task, &buffer);
		assert_eq!(buffer.filtered().to_vec(), vec![0, 1, 2]);
	}

	#[test]
	fn rearm_should_empty_the_view_before_new_matches() {
		let (buffer, _) = buffer(&["alpha", "beta", "alphabet"]);
		buffer.filter_set().push(Pattern::new("alpha").expect("valid"));
		let mut task = FilterTask::new();
		task.rearm(&buffer);
		run_to_end(&mut task, &buffer);
		assert_eq!(buffer.filtered().len(), 2);

		buffer.filter_set().replace_last(Pattern::new("beta").expect("valid"));
		task.rearm(&buffer);
		assert_eq!(buffer.filtered().len(), 0);
		assert_eq!(buffer.filter_attrs().count(), 0);
		assert_eq!(task.cursor(), 0);

		run_to_end(&mut task, &buffer);
		assert_eq!(buffer.filtered().to_vec(), vec![1]);
	}

	#[test]
	fn matching_every_line_twice_should_overflow_the_view() {
		let (buffer, _) = buffer(&["x1", "x2", "x3"]);
		buffer.filter_set().push(Pattern::new("x").expect("valid"));
		let mut task = FilterTask::new();
		task.rearm(&buffer);
		run_to_end(&mut task, &buffer);
		assert_eq!(buffer.filtered().len(), 3);

		task.cursor = 0;
		let err = task.step(&buffer).expect_err("second pass overflows");
		assert!(matches!(err, Error::FilteredViewOverflow { capacity: 3 }));
	}

	#[test]
	fn progress_should_be_published_in_steps_of_five() {
		let lines: Vec<String> = (0..40).map(|idx| format!("line {idx}")).collect();
		let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
		let (buffer, sink) = buffer(&refs);
		buffer.filter_set().push(Pattern::new("line").expect("valid"));
		let mut task = FilterTask::new();
		task.rearm(&buffer);
		sink.topics.lock().expect("topics lock").clear();

		task.step(&buffer).expect("step");
		assert_eq!(buffer.filter_progress(), 0);
		assert!(sink.topics.lock().expect("topics lock").is_empty());

		task.step(&buffer).expect("step");
		assert_eq!(buffer.filter_progress(), 5);
		run_to_end(&mut task, &buffer);
		assert_eq!(buffer.filter_progress(), 100);
		assert_eq!(sink.topics.lock().expect("topics lock").len(), 20);
	}

	#[test]
	fn empty_filter_set_should_leave_task_idle() {
		let (buffer, _) = buffer(&["a"]);
		let mut task = FilterTask::new();
		task.rearm(&buffer);
		assert!(task.is_idle(&buffer));
	}

	#[test]
	fn empty_buffer_should_report_complete_progress() {
		let (buffer, _) = buffer(&[]);
		buffer.filter_set().push(Pattern::new("error").expect("valid"));
		let mut task = FilterTask::new();
		task.rearm(&buffer);
		assert!(task.is_idle(&buffer));
		assert_eq!(buffer.filter_progress(), 100);
	}

	#[test]
	fn signal_during_scan_should_restart_with_new_filters() {
		let lines: Vec<String> = (0..100_000).map(|idx| if idx % 2 == 0 { format!("{idx} a") } else { format!("{idx} b") }).collect();
		let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
		let (buffer, _) = buffer(&refs);
		buffer.filter_set().push(Pattern::new("a|b").expect("valid"));
		let mut processor = Processor::new(buffer.clone(), FilterTask::new());
		processor.start().expect("start filter worker");
		assert!(wait_until(|| buffer.filtered().len() > 0));

		buffer.filter_set().replace_last(Pattern::new("b").expect("valid"));
		processor.signal();
		assert!(wait_until(|| buffer.filter_progress() == 100 && buffer.filtered().len() == 50_000));
		assert!(buffer.filtered().to_vec().iter().all(|line| line % 2 == 1));
		processor.stop();
	}

	#[test]
	fn processor_should_rescan_when_signalled_mid_life() {
		let (buffer, sink) = buffer(&["error: disk", "info: ok", "error: net", "warn: slow"]);
		buffer.filter_set().push(Pattern::new("error").expect("valid"));
		let mut processor = Processor::new(buffer.clone(), FilterTask::new());
		processor.start().expect("start filter worker");
		processor.start().expect("second start is a no-op");
		assert!(processor.is_running());

		assert!(wait_until(|| buffer.filter_progress() == 100 && buffer.filtered().len() == 2));
		assert_eq!(buffer.filtered().to_vec(), vec![0, 2]);

		buffer.filter_set().replace_last(Pattern::new("warn|info").expect("valid"));
		processor.signal();
		assert!(wait_until(|| buffer.filtered().to_vec() == vec![1, 3]));

		processor.stop();
		assert!(!processor.is_running());
		assert!(sink.topics.lock().expect("topics lock").contains(&Topic::Buffer));
	}
}
