use anyhow::Result;
use serde::Serialize;
use uniwash::EsdFailOutcome;

use super::emit;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EsdFailResponse {
    pub rewash_count: u32,
    pub scrapped: bool,
}

impl From<EsdFailOutcome> for EsdFailResponse {
    fn from(outcome: EsdFailOutcome) -> Self {
        match outcome {
            EsdFailOutcome::Rewash { new_count } => Self {
                rewash_count: new_count,
                scrapped: false,
            },
            EsdFailOutcome::Scrapped { new_count } => Self {
                rewash_count: new_count,
                scrapped: true,
            },
        }
    }
}

pub async fn begin(state: &AppState, json: bool, id: &str) -> Result<()> {
    let job = state.lifecycle.begin_esd(id).await?;
    emit(json, &job, |job| {
        println!(
            "{} {} ({}) ready for ESD test, washed {} time(s) before",
            job.wash_id, job.uniform_code, job.color, job.rewash_count
        )
    })
}

pub async fn pass(state: &AppState, json: bool, id: &str) -> Result<()> {
    let entry = state.lifecycle.esd_pass(id).await?;
    emit(json, &entry, |entry| {
        println!("{} passed, {} ({}) back in stock", entry.wash_id, entry.uniform_code, entry.color)
    })
}

pub async fn fail(state: &AppState, json: bool, id: &str) -> Result<()> {
    let response = EsdFailResponse::from(state.lifecycle.esd_fail(id).await?);
    emit(json, &response, |r| {
        if r.scrapped {
            println!("Failed {} times, uniform scrapped", r.rewash_count);
        } else {
            println!("Failed, queued for rewash #{}", r.rewash_count);
        }
    })
}
