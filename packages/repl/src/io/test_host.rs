//! In-memory `IoHost` for exercising the REPL loop without a terminal.

use std::collections::VecDeque;

use super::{
    CompletionKind, InputLine, IoError, IoHost, Output, OutputStyle, PathSource, PromptConfig,
    Signal,
};

/// Test host with in-memory I/O buffers.
///
/// Input lines and signals are queued and consumed in order; once both
/// queues are drained the host reports end of input. Output is buffered for
/// later inspection. Completion probes are answered against the session the
/// next time the core waits for input.
#[derive(Debug, Default)]
pub struct TestHost {
    input_queue: VecDeque<String>,
    signal_queue: VecDeque<Signal>,
    output_buffer: Vec<Output>,
    prompts: Vec<PromptConfig>,
    probes: Vec<(String, CompletionKind)>,
    completions: Vec<Vec<String>>,
    flush_count: usize,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_input(&mut self, line: impl Into<String>) {
        self.input_queue.push_back(line.into());
    }

    pub fn queue_inputs(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
        for line in lines {
            self.queue_input(line);
        }
    }

    pub fn queue_signal(&mut self, signal: Signal) {
        self.signal_queue.push_back(signal);
    }

    /// Ask for completions of `partial` at the next wait.
    pub fn probe_completion(&mut self, partial: impl Into<String>, kind: CompletionKind) {
        self.probes.push((partial.into(), kind));
    }

    pub fn output(&self) -> &[Output] {
        &self.output_buffer
    }

    /// Normal output only, one entry per line written.
    pub fn normal_lines(&self) -> Vec<&str> {
        self.output_with_style(OutputStyle::Normal)
            .into_iter()
            .flat_map(str::lines)
            .collect()
    }

    /// Output of one style as text. Non-UTF-8 output shows up as `<binary>`;
    /// see [`TestHost::raw_output`] for the bytes.
    pub fn output_with_style(&self, style: OutputStyle) -> Vec<&str> {
        self.output_buffer
            .iter()
            .filter(|o| o.style == style)
            .map(|o| std::str::from_utf8(&o.data).unwrap_or("<binary>"))
            .collect()
    }

    /// Normal output exactly as written.
    pub fn raw_output(&self) -> Vec<&[u8]> {
        self.output_buffer
            .iter()
            .filter(|o| o.style == OutputStyle::Normal)
            .map(|o| o.data.as_slice())
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.output_with_style(OutputStyle::Error)
    }

    pub fn prompts(&self) -> &[PromptConfig] {
        &self.prompts
    }

    pub fn last_prompt(&self) -> Option<&PromptConfig> {
        self.prompts.last()
    }

    /// Answers to completion probes, in probe order.
    pub fn completions(&self) -> &[Vec<String>] {
        &self.completions
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }
}

impl IoHost for TestHost {
    fn wait_for_input(&mut self, paths: &dyn PathSource) -> Result<(), IoError> {
        for (partial, kind) in self.probes.drain(..) {
            self.completions.push(paths.complete_path(&partial, kind));
        }
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.input_queue.pop_front().map(|line| InputLine { line }))
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        if let Some(signal) = self.signal_queue.pop_front() {
            return Ok(Some(signal));
        }
        if self.input_queue.is_empty() {
            return Ok(Some(Signal::Eof));
        }
        Ok(None)
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        self.output_buffer.push(output);
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.prompts.push(config);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.flush_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl PathSource for Echo {
        fn complete_path(&self, partial: &str, _kind: CompletionKind) -> Vec<String> {
            vec![format!("{partial}!")]
        }
    }

    #[test]
    fn signals_come_before_input() {
        let mut host = TestHost::new();
        host.queue_input("ls");
        host.queue_signal(Signal::Interrupt);

        assert!(matches!(host.read_signal().unwrap(), Some(Signal::Interrupt)));
        assert!(host.read_signal().unwrap().is_none());
        assert_eq!(host.read_input().unwrap().unwrap().line, "ls");
    }

    #[test]
    fn drained_host_reports_eof() {
        let mut host = TestHost::new();
        assert!(matches!(host.read_signal().unwrap(), Some(Signal::Eof)));
        assert!(host.read_input().unwrap().is_none());
    }

    #[test]
    fn probes_are_answered_on_wait() {
        let mut host = TestHost::new();
        host.probe_completion("fo", CompletionKind::Keys);
        host.wait_for_input(&Echo).unwrap();
        host.wait_for_input(&Echo).unwrap();
        assert_eq!(host.completions(), &[vec!["fo!".to_string()]]);
    }

    #[test]
    fn normal_lines_split_multiline_output() {
        let mut host = TestHost::new();
        host.write_output(Output::normal("a\nb")).unwrap();
        host.write_output(Output::error("oops")).unwrap();
        host.write_output(Output::normal("c")).unwrap();

        assert_eq!(host.normal_lines(), vec!["a", "b", "c"]);
        assert_eq!(host.errors(), vec!["oops"]);
    }

    #[test]
    fn prompts_are_recorded() {
        let mut host = TestHost::new();
        host.write_prompt(PromptConfig::default()).unwrap();
        host.flush().unwrap();
        assert_eq!(host.prompts().len(), 1);
        assert_eq!(host.flush_count(), 1);
    }
}
