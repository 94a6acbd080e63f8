use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::domain::{
    analysis::CompanyAnalysis,
    company::{CompanyQuery, CompanyRecord},
};

use super::{ownership_analyzer::UNEXPECTED_FAILURE, OwnershipAnalyzer};

struct AnalysisJob {
    index: usize,
    company: CompanyQuery,
}

type JobReceiver = Arc<Mutex<mpsc::Receiver<AnalysisJob>>>;

/// Fans a batch of companies out over a fixed number of workers and collects
/// one record per input, in input order.
pub struct BatchOrchestrator {
    analyzer: Arc<OwnershipAnalyzer>,
    pool_size: usize,
}

impl BatchOrchestrator {
    pub fn new(analyzer: Arc<OwnershipAnalyzer>, pool_size: usize) -> Self {
        BatchOrchestrator {
            analyzer,
            pool_size: pool_size.max(1),
        }
    }

    pub async fn analyze_batch(&self, records: Vec<CompanyRecord>) -> Vec<CompanyAnalysis> {
        let batch_id = Uuid::new_v4();
        log::info!(
            "Batch {}: processing {} companies with {} workers",
            batch_id,
            records.len(),
            self.pool_size
        );

        let mut slots: Vec<Option<CompanyAnalysis>> = vec![None; records.len()];
        let mut jobs = vec![];

        for (index, record) in records.iter().enumerate() {
            match record.to_query() {
                Ok(company) => jobs.push(AnalysisJob { index, company }),
                Err(reason) => {
                    log::warn!("Batch {}: skipping entry {}: {}", batch_id, index, reason);
                    slots[index] = Some(CompanyAnalysis::rejected(record, reason));
                }
            }
        }

        if !jobs.is_empty() {
            self.run_workers(batch_id, jobs, &mut slots).await;
        }

        let analyses: Vec<CompanyAnalysis> = slots
            .into_iter()
            .zip(records.iter())
            .map(|(slot, record)| match slot {
                Some(analysis) => analysis,
                None => {
                    log::error!("Batch {}: no result collected for {:?}", batch_id, record.name);
                    CompanyAnalysis::rejected(record, UNEXPECTED_FAILURE)
                }
            })
            .collect();

        log::info!("Batch {}: done", batch_id);
        analyses
    }

    async fn run_workers(
        &self,
        batch_id: Uuid,
        jobs: Vec<AnalysisJob>,
        slots: &mut [Option<CompanyAnalysis>],
    ) {
        let (job_sender, job_receiver) = mpsc::channel::<AnalysisJob>(jobs.len());
        let (result_sender, mut result_receiver) =
            mpsc::channel::<(usize, CompanyAnalysis)>(jobs.len());
        let job_receiver: JobReceiver = Arc::new(Mutex::new(job_receiver));

        for job in jobs {
            if job_sender.send(job).await.is_err() {
                log::error!("Batch {}: job queue closed early", batch_id);
                break;
            }
        }
        drop(job_sender);

        let workers: Vec<_> = (0..self.pool_size)
            .map(|worker_id| {
                let analyzer = self.analyzer.clone();
                let job_receiver = job_receiver.clone();
                let result_sender = result_sender.clone();
                tokio::spawn(async move {
                    analysis_worker(worker_id, analyzer, job_receiver, result_sender).await
                })
            })
            .collect();
        drop(result_sender);

        while let Some((index, analysis)) = result_receiver.recv().await {
            slots[index] = Some(analysis);
        }

        for worker in futures::future::join_all(workers).await {
            if let Err(e) = worker {
                log::error!("Batch {}: worker stopped abnormally: {}", batch_id, e);
            }
        }
    }
}

async fn analysis_worker(
    worker_id: usize,
    analyzer: Arc<OwnershipAnalyzer>,
    job_receiver: JobReceiver,
    result_sender: mpsc::Sender<(usize, CompanyAnalysis)>,
) {
    loop {
        let job = { job_receiver.lock().await.recv().await };
        let Some(job) = job else {
            break;
        };

        log::debug!(
            "Worker {} picked up entry {}: {}",
            worker_id,
            job.index,
            job.company.display_name()
        );
        let analysis = analyzer.analyze(&job.company).await;

        if result_sender.send((job.index, analysis)).await.is_err() {
            log::error!("Worker {}: result channel closed", worker_id);
            break;
        }
    }
}
