use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Drives a [`Pipeline`] through its extract, transform and load phases.
pub struct TrackerEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> TrackerEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<Vec<String>> {
        let started = Instant::now();
        tracing::info!("Starting CFP lookup");

        let conferences = self.pipeline.extract().await?;
        tracing::info!("Loaded {} conferences", conferences.len());

        let output = self.pipeline.transform(conferences).await?;
        let resolved = output
            .cfp
            .iter()
            .filter(|row| row.cfp_deadline != crate::domain::model::TBA)
            .count();
        tracing::info!(
            "Resolved deadlines for {}/{} conferences",
            resolved,
            output.cfp.len()
        );

        let paths = self.pipeline.load(output).await?;
        for path in &paths {
            tracing::info!("Output saved to: {}", path);
        }

        tracing::info!("Finished in {:?}", started.elapsed());
        Ok(paths)
    }
}
