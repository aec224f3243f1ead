#[derive(Debug, Clone)]
pub struct TaskMetrics {
    pub name: String,
    pub duration_ms: u128,
}

#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub total_duration_ms: u128,
    pub tasks: Vec<TaskMetrics>,
}

impl PipelineMetrics {
    pub fn task_duration_ms(&self, name: &str) -> Option<u128> {
        self.tasks
            .iter()
            .find(|task| task.name == name)
            .map(|task| task.duration_ms)
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.name.as_str()).collect()
    }

    pub fn log(&self) {
        for task in &self.tasks {
            tracing::debug!(
                task = %task.name,
                duration_ms = task.duration_ms as u64,
                "Task finished"
            );
        }
        tracing::info!(total_ms = self.total_duration_ms as u64, "Bootstrap pipeline complete");
    }
}
