use crate::models::job::Job;

/// Live search over the listing: case-insensitive substring match on title, location
/// and description. An empty query matches everything. Recomputed on every call.
pub fn filter_jobs<'a, I>(jobs: I, query: &str) -> Vec<&'a Job>
where
    I: IntoIterator<Item = &'a Job>,
{
    let query = query.to_lowercase();
    jobs.into_iter()
        .filter(|job| matches_query(job, &query))
        .collect()
}

fn matches_query(job: &Job, query: &str) -> bool {
    query.is_empty()
        || job.title.to_lowercase().contains(query)
        || job.location.to_lowercase().contains(query)
        || job.description.to_lowercase().contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, location: &str, description: &str) -> Job {
        Job {
            job_id: None,
            title: title.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            salary_range: String::new(),
            experience_level: "Mid".to_string(),
            job_type: "Full-time".to_string(),
        }
    }

    fn listing() -> Vec<Job> {
        vec![
            job("Rust Engineer", "Remote", "Async services and storage engines"),
            job("Data Analyst", "Cairo", "SQL, dashboards and reporting"),
            job("Frontend Developer", "Alexandria", "React and design systems"),
            job("Platform Engineer", "Cairo", "Kubernetes, Rust tooling"),
        ]
    }

    fn titles(jobs: &[&Job]) -> Vec<String> {
        jobs.iter().map(|j| j.title.clone()).collect()
    }

    #[test]
    fn test_empty_query_returns_all() {
        let jobs = listing();
        assert_eq!(filter_jobs(&jobs, "").len(), 4);
    }

    #[test]
    fn test_matches_title_location_description() {
        let jobs = listing();
        assert_eq!(
            titles(&filter_jobs(&jobs, "rust")),
            vec!["Rust Engineer", "Platform Engineer"]
        );
        assert_eq!(
            titles(&filter_jobs(&jobs, "cairo")),
            vec!["Data Analyst", "Platform Engineer"]
        );
        assert_eq!(titles(&filter_jobs(&jobs, "react")), vec!["Frontend Developer"]);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let jobs = listing();
        assert_eq!(
            titles(&filter_jobs(&jobs, "ENGINEER")),
            titles(&filter_jobs(&jobs, "engineer"))
        );
    }

    #[test]
    fn test_no_match() {
        let jobs = listing();
        assert!(filter_jobs(&jobs, "cobol").is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let jobs = listing();
        for query in ["", "rust", "cairo", "eng", "zzz", "a"] {
            let once = filter_jobs(&jobs, query);
            let twice = filter_jobs(once.iter().copied(), query);
            assert_eq!(once, twice, "query {query:?}");
        }
    }

    #[test]
    fn test_filter_preserves_listing_order() {
        let jobs = listing();
        let filtered = filter_jobs(&jobs, "e");
        let positions: Vec<usize> = filtered
            .iter()
            .map(|f| jobs.iter().position(|j| std::ptr::eq(j, *f)).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }
}
