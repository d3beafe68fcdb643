use crate::{
    sample::{ElevationSample, IndexedSample},
    trajectory::coords_from_rows,
    wms::{parse_elevation, Ahn, DataType, HttpTransport, Service, Transport},
    SurfaceError,
};
use geo::geometry::Coord;
use log::{debug, warn};
use rayon::{prelude::*, ThreadPoolBuilder};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

/// Lowest elevation in the Netherlands, in meters, with margin.
pub const MIN_ALLOWED_ELEVATION: f64 = -7.0;

/// Highest elevation in the Netherlands, in meters, with margin.
pub const MAX_ALLOWED_ELEVATION: f64 = 323.0;

/// Upper bound on requests in flight.
pub const DEFAULT_MAX_CONCURRENCY: usize = 500;

/// Samples elevation from the AHN service, one request per point.
#[derive(Debug, Clone)]
pub struct RemoteSampler<T = HttpTransport> {
    service: Service,
    max_concurrency: usize,
    fail_fast: bool,
    transport: T,
}

impl RemoteSampler {
    pub fn builder() -> RemoteSamplerBuilder {
        RemoteSamplerBuilder {
            ahn: Ahn::default(),
            data_type: DataType::default(),
            crs: None,
            response_crs: None,
            base_url: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout: None,
            fail_fast: false,
        }
    }
}

pub struct RemoteSamplerBuilder {
    ahn: Ahn,

    data_type: DataType,

    /// CRS of the queried coordinates.
    crs: Option<String>,

    /// CRS the service answers in.
    response_crs: Option<String>,

    /// Replaces the release's PDOK endpoint.
    base_url: Option<String>,

    max_concurrency: usize,

    /// Per-request timeout.
    timeout: Option<Duration>,

    /// Skip points not yet requested once any point fails.
    fail_fast: bool,
}

impl RemoteSamplerBuilder {
    pub fn ahn(mut self, ahn: Ahn) -> Self {
        self.ahn = ahn;
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    pub fn response_crs(mut self, crs: impl Into<String>) -> Self {
        self.response_crs = Some(crs.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the most requests in flight at once. Zero is treated as
    /// one.
    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Returns a sampler talking HTTP to the service.
    pub fn build(self) -> Result<RemoteSampler, SurfaceError> {
        let transport = HttpTransport::new(self.timeout)?;
        Ok(self.build_with(transport))
    }

    /// Returns a sampler sending its requests through `transport`.
    ///
    /// The configured timeout is the transport's concern and is not
    /// applied.
    pub fn build_with<T: Transport>(self, transport: T) -> RemoteSampler<T> {
        let mut service = Service::new(self.ahn, self.data_type);
        if let Some(url) = self.base_url {
            service.url = url;
        }
        if let Some(crs) = self.crs {
            service.crs = crs;
        }
        if let Some(crs) = self.response_crs {
            service.response_crs = crs;
        }
        RemoteSampler {
            service,
            max_concurrency: self.max_concurrency.max(1),
            fail_fast: self.fail_fast,
            transport,
        }
    }
}

/// Outcome of one point's request.
enum Task {
    /// Not requested after another point failed.
    Skipped,
    NoData,
    Sampled(IndexedSample),
    Failed(SurfaceError),
}

impl<T: Transport> RemoteSampler<T> {
    pub fn service(&self) -> &Service {
        &self.service
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the elevation at each `[x, y]` row, in row order.
    ///
    /// Points without data, or with an elevation outside
    /// [`MIN_ALLOWED_ELEVATION`]`..=`[`MAX_ALLOWED_ELEVATION`], are
    /// left out.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Shape`] before any request if `rows` are not
    /// all pairs. Otherwise the error of the lowest indexed point that
    /// failed, once every point has been requested.
    pub fn sample<P: AsRef<[f64]>>(&self, rows: &[P]) -> Result<Vec<ElevationSample>, SurfaceError> {
        let coords = coords_from_rows(rows)?;
        self.sample_coords(&coords)
    }

    /// [`RemoteSampler::sample`] for points that are already
    /// coordinates.
    pub fn sample_coords(
        &self,
        coords: &[Coord<f64>],
    ) -> Result<Vec<ElevationSample>, SurfaceError> {
        if coords.is_empty() {
            return Ok(Vec::new());
        }
        let now = std::time::Instant::now();

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.max_concurrency.min(coords.len()))
            .thread_name(|i| format!("ahn-{i}"))
            .build()?;
        let abort = AtomicBool::new(false);
        let tasks: Vec<Task> = pool.install(|| {
            coords
                .par_iter()
                .enumerate()
                .with_max_len(1)
                .map(|(sequence_index, &coord)| self.request(sequence_index, coord, &abort))
                .collect()
        });

        let mut indexed = Vec::with_capacity(tasks.len());
        let mut no_data = 0;
        for task in tasks {
            match task {
                Task::Sampled(sample) => indexed.push(sample),
                Task::NoData => no_data += 1,
                Task::Skipped => (),
                Task::Failed(err) => return Err(err),
            }
        }
        indexed.sort_by_key(|sample| sample.sequence_index);

        let received = indexed.len();
        let samples: Vec<ElevationSample> = indexed
            .into_iter()
            .map(ElevationSample::from)
            .filter(|sample| (MIN_ALLOWED_ELEVATION..=MAX_ALLOWED_ELEVATION).contains(&sample.z))
            .collect();

        debug!(
            "remote samples; layer: {}, points: {}, no_data: {}, out_of_range: {}, exec: {:?}",
            self.service.layer(),
            coords.len(),
            no_data,
            received - samples.len(),
            now.elapsed()
        );
        Ok(samples)
    }

    fn request(&self, sequence_index: usize, coord: Coord<f64>, abort: &AtomicBool) -> Task {
        if self.fail_fast && abort.load(Ordering::Relaxed) {
            return Task::Skipped;
        }
        let query = self.service.query(coord);
        let elevation = self
            .transport
            .get(&self.service.url, &query)
            .and_then(|reply| parse_elevation(&self.service.url, &reply));
        match elevation {
            Ok(Some(z)) => Task::Sampled(IndexedSample {
                sequence_index,
                sample: ElevationSample::new(coord, z),
            }),
            Ok(None) => Task::NoData,
            Err(err) => {
                warn!(
                    "point {sequence_index} at ({}, {}): {err}",
                    coord.x, coord.y
                );
                abort.store(true, Ordering::Relaxed);
                Task::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RemoteSampler, MAX_ALLOWED_ELEVATION, MIN_ALLOWED_ELEVATION};
    use crate::{
        wms::{Reply, Transport},
        SurfaceError,
    };
    use approx::assert_abs_diff_eq;
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
        thread,
        time::Duration,
    };

    /// Answers every request with `respond(x, y)`, where `(x, y)` is
    /// the center of the requested bbox.
    struct FakeTransport<F> {
        respond: F,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
        queries: Mutex<Vec<Vec<(&'static str, String)>>>,
    }

    impl<F> FakeTransport<F>
    where
        F: Fn(f64, f64) -> Result<Reply, SurfaceError> + Sync,
    {
        fn new(respond: F) -> Self {
            Self {
                respond,
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl<F> Transport for FakeTransport<F>
    where
        F: Fn(f64, f64) -> Result<Reply, SurfaceError> + Sync,
    {
        fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<Reply, SurfaceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_owned());
            self.queries.lock().unwrap().push(query.to_vec());
            let bbox = &query.iter().find(|(key, _)| *key == "bbox").unwrap().1;
            let corner: Vec<f64> = bbox
                .split(", ")
                .take(2)
                .map(|v| v.parse::<f64>().unwrap() + 1000.0)
                .collect();
            (self.respond)(corner[0], corner[1])
        }
    }

    fn elevation(z: f64) -> Result<Reply, SurfaceError> {
        Ok(Reply {
            status: 200,
            body: format!(r#"{{"features": [{{"properties": {{"value_list": {z}}}}}]}}"#)
                .into_bytes(),
        })
    }

    fn no_data() -> Result<Reply, SurfaceError> {
        Ok(Reply {
            status: 200,
            body: br#"{"type": "FeatureCollection", "features": []}"#.to_vec(),
        })
    }

    fn status(status: u16) -> Result<Reply, SurfaceError> {
        Ok(Reply {
            status,
            body: Vec::new(),
        })
    }

    fn line(n: usize) -> Vec<[f64; 2]> {
        (0..n).map(|i| [i as f64, 0.0]).collect()
    }

    #[test]
    fn test_restores_input_order() {
        let n = 24;
        // Early points answer last.
        let transport = FakeTransport::new(move |x, _| {
            thread::sleep(Duration::from_millis(2 * (n as u64 - x as u64)));
            elevation(x)
        });
        let sampler = RemoteSampler::builder()
            .max_concurrency(8)
            .build_with(transport);
        let samples = sampler.sample(&line(n)).unwrap();
        let xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
        let zs: Vec<f64> = samples.iter().map(|s| s.z).collect();
        let expected: Vec<f64> = (0..n).map(|i| i as f64).collect();
        assert_eq!(xs, expected);
        assert_eq!(zs, expected);
    }

    #[test]
    fn test_filters_out_of_range() {
        let transport = FakeTransport::new(|x, _| match x as usize {
            0 => elevation(-7.5),
            1 => elevation(MIN_ALLOWED_ELEVATION),
            2 => elevation(1.25),
            3 => elevation(MAX_ALLOWED_ELEVATION),
            4 => elevation(323.01),
            _ => Ok(Reply {
                status: 200,
                body: br#"{"features": [{"properties": {"value_list": "NaN"}}]}"#.to_vec(),
            }),
        });
        let sampler = RemoteSampler::builder().build_with(transport);
        let samples = sampler.sample(&line(6)).unwrap();
        let zs: Vec<f64> = samples.iter().map(|s| s.z).collect();
        assert_eq!(zs, vec![-7.0, 1.25, 323.0]);
        assert_eq!(samples[1].x, 2.0);
    }

    #[test]
    fn test_skips_points_without_data() {
        let transport = FakeTransport::new(|x, _| {
            if x as usize % 2 == 0 {
                no_data()
            } else {
                elevation(x)
            }
        });
        let sampler = RemoteSampler::builder().build_with(transport);
        let samples = sampler.sample(&line(7)).unwrap();
        let xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_error_after_every_point_is_requested() {
        let n = 16;
        let transport = FakeTransport::new(|x, _| {
            if x as usize == 3 {
                status(502)
            } else {
                elevation(0.0)
            }
        });
        let sampler = RemoteSampler::builder()
            .max_concurrency(4)
            .build_with(transport);
        let result = sampler.sample(&line(n));
        assert!(matches!(result, Err(SurfaceError::Connectivity { .. })));
        assert_eq!(sampler.transport.calls(), n);
    }

    #[test]
    fn test_reports_lowest_indexed_error() {
        let transport = FakeTransport::new(|x, _| match x as usize {
            2 => {
                thread::sleep(Duration::from_millis(50));
                Ok(Reply {
                    status: 200,
                    body: b"{}".to_vec(),
                })
            }
            5 => status(404),
            _ => elevation(0.0),
        });
        let sampler = RemoteSampler::builder().build_with(transport);
        assert!(matches!(
            sampler.sample(&line(8)),
            Err(SurfaceError::Format { .. })
        ));
    }

    #[test]
    fn test_shape_checked_before_requests() {
        let rows: Vec<[f64; 3]> = (0..5)
            .flat_map(|x| (0..5).map(move |y| [64663.8 + x as f64, 393995.8 + y as f64, 5.0]))
            .collect();
        let sampler = RemoteSampler::builder().build_with(FakeTransport::new(|_, _| elevation(0.0)));
        let err = sampler.sample(&rows).unwrap_err();
        assert_eq!(
            err.to_string(),
            "trajectory should be of shape (:, 2) but is of shape (25, 3)"
        );
        assert_eq!(sampler.transport.calls(), 0);
    }

    #[test]
    fn test_repeated_calls_do_not_accumulate() {
        let transport = FakeTransport::new(|x, y| elevation(x + y));
        let sampler = RemoteSampler::builder().build_with(transport);
        let rows = [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let first = sampler.sample(&rows).unwrap();
        let second = sampler.sample(&rows).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert!(sampler.sample_coords(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_fail_fast_skips_remaining_points() {
        let n = 32;
        let transport = FakeTransport::new(|_, _| status(500));
        let sampler = RemoteSampler::builder()
            .max_concurrency(1)
            .fail_fast(true)
            .build_with(transport);
        assert!(matches!(
            sampler.sample(&line(n)),
            Err(SurfaceError::Connectivity { .. })
        ));
        assert!(sampler.transport.calls() < n);
    }

    #[test]
    fn test_request_parameters() {
        let transport = FakeTransport::new(|_, _| no_data());
        let sampler = RemoteSampler::builder()
            .ahn("ahn2".parse().unwrap())
            .base_url("http://localhost:8080/wms")
            .response_crs("EPSG:4326")
            .build_with(transport);
        sampler.sample(&[[64663.8, 393995.8]]).unwrap();

        assert_eq!(
            *sampler.transport.urls.lock().unwrap(),
            vec!["http://localhost:8080/wms".to_owned()]
        );
        let queries = sampler.transport.queries.lock().unwrap();
        let get = |key: &str| {
            queries[0]
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("layers").as_deref(), Some("ahn2_5m"));
        assert_eq!(get("crs").as_deref(), Some("EPSG:28992"));
        assert_eq!(get("response_crs").as_deref(), Some("EPSG:4326"));
        assert_eq!(
            get("bbox").as_deref(),
            Some("63663.8, 392995.8, 65663.8, 394995.8")
        );
    }

    #[test]
    #[ignore = "requires network access to service.pdok.nl"]
    fn test_ahn3_line() {
        let rows: Vec<[f64; 2]> = (0..5).map(|x| [64663.8 + f64::from(x), 393995.8]).collect();
        let samples = RemoteSampler::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap()
            .sample(&rows)
            .unwrap();
        assert_eq!(samples.len(), 5);
        for (sample, row) in samples.iter().zip(&rows) {
            assert_eq!(sample.x, row[0]);
            assert!((MIN_ALLOWED_ELEVATION..=MAX_ALLOWED_ELEVATION).contains(&sample.z));
        }
    }

    #[test]
    #[ignore = "requires network access to service.pdok.nl"]
    fn test_ahn3_point() {
        let samples = RemoteSampler::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap()
            .sample(&[[102428.7263, 472806.5402]])
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert_abs_diff_eq!(samples[0].z, -5.0669, epsilon = 1e-2);
    }
}
