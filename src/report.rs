//! Result-sink interfaces for query and clustering output.
//!
//! The search engine itself never formats or writes files; callers hand it
//! a [`ReportSink`] and receive per-query records (approximate results next
//! to the exact baseline, with timings) and per-run cluster summaries.
//! [`TextSink`] renders the classic text layout
//! (`CLUSTER-1 {size: .., centroid: [..]}`); [`MemorySink`] collects records
//! for tests and programmatic consumers.

use std::io::{self, Write};
use std::time::Duration;

use crate::cluster::{Clustering, SilhouetteStats};
use crate::exact::Neighbor;

/// One query's worth of results: the approximate answer, the exact
/// baseline it is measured against, and the elapsed time of each.
#[derive(Debug, Clone)]
pub struct QueryRecord {
    /// Caller-assigned query id (typically the query's position in the
    /// test set).
    pub query_id: usize,
    /// Approximate results, ascending by distance; may be shorter than
    /// requested.
    pub approximate: Vec<Neighbor>,
    /// Exact baseline from the brute-force scan.
    pub exact: Vec<Neighbor>,
    pub approximate_time: Duration,
    pub exact_time: Duration,
    /// Range-search matches, when the caller ran one.
    pub range_matches: Vec<usize>,
}

/// Summary of one clustering run.
#[derive(Debug, Clone)]
pub struct ClusterReport {
    /// Human-readable assignment-method label.
    pub method: String,
    pub clustering: Clustering,
    pub silhouette: SilhouetteStats,
    pub elapsed: Duration,
    /// Include per-cluster member-index lists in rendered output.
    pub complete: bool,
}

/// Destination for engine output.
pub trait ReportSink {
    fn query(&mut self, record: &QueryRecord) -> io::Result<()>;
    fn clustering(&mut self, report: &ClusterReport) -> io::Result<()>;
}

/// Collects records in memory; the sink of choice for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub queries: Vec<QueryRecord>,
    pub clusterings: Vec<ClusterReport>,
}

impl ReportSink for MemorySink {
    fn query(&mut self, record: &QueryRecord) -> io::Result<()> {
        self.queries.push(record.clone());
        Ok(())
    }

    fn clustering(&mut self, report: &ClusterReport) -> io::Result<()> {
        self.clusterings.push(report.clone());
        Ok(())
    }
}

/// Renders records as plain text to any writer.
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn query(&mut self, record: &QueryRecord) -> io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "Query: {}", record.query_id)?;
        for (rank, nb) in record.approximate.iter().enumerate() {
            writeln!(w, "Nearest neighbor-{}: {}", rank + 1, nb.index)?;
            writeln!(w, "distanceApproximate: {}", nb.distance)?;
            if let Some(exact) = record.exact.get(rank) {
                writeln!(w, "distanceTrue: {}", exact.distance)?;
            }
        }
        writeln!(
            w,
            "tApproximate: {:.6}s / tTrue: {:.6}s",
            record.approximate_time.as_secs_f64(),
            record.exact_time.as_secs_f64()
        )?;
        if !record.range_matches.is_empty() {
            writeln!(w, "R-near neighbors:")?;
            for index in &record.range_matches {
                writeln!(w, "{index}")?;
            }
        }
        writeln!(w)
    }

    fn clustering(&mut self, report: &ClusterReport) -> io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "Algorithm: {}", report.method)?;
        for (i, (members, centroid)) in report
            .clustering
            .clusters
            .iter()
            .zip(report.clustering.centroids.iter())
            .enumerate()
        {
            write!(w, "CLUSTER-{} {{size: {}, centroid: [", i + 1, members.len())?;
            for (j, c) in centroid.iter().enumerate() {
                if j > 0 {
                    write!(w, " ")?;
                }
                write!(w, "{c}")?;
            }
            writeln!(w, "]}}")?;
        }
        writeln!(w, "clustering_time: {:.6}", report.elapsed.as_secs_f64())?;

        write!(w, "Silhouette: [")?;
        for (j, s) in report.silhouette.per_cluster.iter().enumerate() {
            if j > 0 {
                write!(w, ", ")?;
            }
            write!(w, "{s:.4}")?;
        }
        writeln!(w, ", {:.4}]", report.silhouette.overall)?;

        if report.complete {
            for (i, members) in report.clustering.clusters.iter().enumerate() {
                write!(w, "CLUSTER-{} {{", i + 1)?;
                for (j, index) in members.iter().enumerate() {
                    if j > 0 {
                        write!(w, ", ")?;
                    }
                    write!(w, "{index}")?;
                }
                writeln!(w, "}}")?;
            }
        }
        Ok(())
    }
}
