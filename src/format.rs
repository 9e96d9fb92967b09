use crate::{
    error::RimagenError,
    models::{DownloadedAsset, GenerationRequest, Job},
};

/// Final textual assembly of tool responses. Everything here is pure:
/// adapters hand over structured values and this module renders them,
/// keeping machine-relevant fields (ids, statuses, paths, sources) in the
/// text instead of discarding them.

pub fn format_generation(request: &GenerationRequest, assets: &[DownloadedAsset]) -> String {
    let mut out = String::from("Image generation complete.\n\n");
    push_request(&mut out, request);
    out.push('\n');
    push_assets(&mut out, assets);
    push_save_note(&mut out, assets);
    out
}

pub fn format_submission(job: &Job) -> String {
    let mut out = String::from("Generation job submitted.\n\n");
    out.push_str(&format!("Job id: {}\n", job.id));
    out.push_str(&format!("Status: {}\n", job.status.as_str()));
    if let Some(created) = job.created_at {
        out.push_str(&format!("Created: {}\n", created.to_rfc3339()));
    }
    if let Some(request) = &job.input {
        out.push('\n');
        push_request(&mut out, request);
    }
    out.push_str("\nUse get_job with this id to poll for results.\n");
    out
}

pub fn format_job(job: &Job, assets: Option<&[DownloadedAsset]>) -> String {
    let mut out = format!("Job {}\n", job.id);
    out.push_str(&format!("Status: {}\n", job.status.as_str()));
    if let Some(created) = job.created_at {
        out.push_str(&format!("Created: {}\n", created.to_rfc3339()));
    }
    if let Some(started) = job.started_at {
        out.push_str(&format!("Started: {}\n", started.to_rfc3339()));
    }
    if let Some(completed) = job.completed_at {
        out.push_str(&format!("Completed: {}\n", completed.to_rfc3339()));
    }

    if let Some(request) = &job.input {
        out.push('\n');
        push_request(&mut out, request);
    }

    if let Some(assets) = assets {
        out.push('\n');
        push_assets(&mut out, assets);
        push_save_note(&mut out, assets);
    }

    if let Some(error) = &job.error {
        out.push_str(&format!("\nError: {}\n", error));
    }
    if let Some(logs) = &job.logs {
        out.push_str(&format!("\nLogs:\n{}\n", logs));
    }
    out
}

/// Uniform failure rendering: kind tag first, message verbatim.
pub fn format_failure(error: &RimagenError) -> String {
    format!("Operation failed ({}): {}", error.kind(), error)
}

fn push_request(out: &mut String, request: &GenerationRequest) {
    out.push_str(&format!("Prompt: {}\n", request.prompt));
    out.push_str(&format!(
        "Aspect ratio: {}\n",
        request.aspect_ratio.as_str()
    ));
    out.push_str(&format!("Images requested: {}\n", request.number_of_images));
    out.push_str(&format!(
        "Prompt optimizer: {}\n",
        if request.prompt_optimizer {
            "enabled"
        } else {
            "disabled"
        }
    ));
    if let Some(subject) = &request.subject_reference {
        out.push_str(&format!("Subject reference: {}\n", subject));
    }
}

fn push_assets(out: &mut String, assets: &[DownloadedAsset]) {
    for asset in assets {
        out.push_str(&format!("Image {}:\n", asset.index));
        out.push_str(&format!("  Filename: {}\n", asset.filename));
        match &asset.local_path {
            Some(path) => out.push_str(&format!("  Saved to: {}\n", path.display())),
            None => out.push_str(&format!(
                "  Save failed: {}\n",
                asset.error.as_deref().unwrap_or("unknown error")
            )),
        }
        // The source is always listed so the caller can fall back to it.
        out.push_str(&format!("  Source: {}\n", asset.source));
    }
}

fn push_save_note(out: &mut String, assets: &[DownloadedAsset]) {
    if assets.is_empty() {
        return;
    }
    let failed = assets.iter().filter(|asset| !asset.saved).count();
    if failed == 0 {
        out.push_str(&format!("\nAll {} images saved locally.\n", assets.len()));
    } else {
        out.push_str(&format!(
            "\nGeneration succeeded; {} of {} images could not be saved locally. Source references remain usable.\n",
            failed,
            assets.len()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectRatio, JobStatus};
    use std::path::PathBuf;

    fn sample_request() -> GenerationRequest {
        GenerationRequest::new("A Red Panda")
            .with_aspect_ratio(AspectRatio::Wide)
            .with_image_count(3)
    }

    fn mixed_assets() -> Vec<DownloadedAsset> {
        vec![
            DownloadedAsset::saved(1, "a_1.png", PathBuf::from("/out/a_1.png"), "https://cdn/1"),
            DownloadedAsset::failed(2, "a_2.png", "https://cdn/2", "unexpected status 503"),
            DownloadedAsset::saved(3, "a_3.png", PathBuf::from("/out/a_3.png"), "https://cdn/3"),
        ]
    }

    #[test]
    fn test_all_saved_note() {
        let assets = vec![DownloadedAsset::saved(
            1,
            "a.png",
            PathBuf::from("/out/a.png"),
            "https://cdn/1",
        )];
        let text = format_generation(&sample_request(), &assets);
        assert!(text.contains("All 1 images saved locally."));
        assert!(text.contains("Prompt: A Red Panda"));
        assert!(text.contains("Aspect ratio: 16:9"));
    }

    #[test]
    fn test_degraded_save_lists_every_source() {
        let text = format_generation(&sample_request(), &mixed_assets());
        assert!(text.contains(
            "Generation succeeded; 1 of 3 images could not be saved locally. Source references remain usable."
        ));
        for source in ["https://cdn/1", "https://cdn/2", "https://cdn/3"] {
            assert!(text.contains(source), "missing source {}", source);
        }
        assert!(text.contains("Save failed: unexpected status 503"));
    }

    #[test]
    fn test_job_formatting_carries_machine_fields() {
        let mut job = Job::new("job-9", JobStatus::Failed);
        job.input = Some(sample_request());
        job.error = Some("NSFW content detected".into());
        job.logs = Some("step 1\nstep 2".into());

        let text = format_job(&job, None);
        assert!(text.contains("Job job-9"));
        assert!(text.contains("Status: failed"));
        assert!(text.contains("Error: NSFW content detected"));
        assert!(text.contains("step 2"));
    }

    #[test]
    fn test_submission_points_at_get_job() {
        let mut job = Job::new("job-4", JobStatus::Queued);
        job.input = Some(sample_request());
        let text = format_submission(&job);
        assert!(text.contains("Job id: job-4"));
        assert!(text.contains("Status: queued"));
        assert!(text.contains("get_job"));
    }

    #[test]
    fn test_failure_formatting_keeps_kind_and_message() {
        let text = format_failure(&RimagenError::Remote("status 429: slow down".into()));
        assert!(text.contains("(remote)"));
        assert!(text.contains("status 429: slow down"));
    }
}
