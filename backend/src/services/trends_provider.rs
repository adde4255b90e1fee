use crate::error::ProviderError;
use crate::services::categories::Timeframe;
use crate::utils::{parse_unix_date, strip_json_prefix};
use chrono::NaiveDate;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// One keyword's column in a provider table.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    pub label: String,
    pub values: Vec<T>,
}

/// Interest over time: one row per date, one column per queried keyword.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeriesTable {
    pub dates: Vec<NaiveDate>,
    pub series: Vec<Series<i64>>,
}

/// Interest by region: one row per region name, one column per queried keyword.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionalTable {
    pub regions: Vec<String>,
    pub series: Vec<Series<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawTable {
    TimeSeries(TimeSeriesTable),
    Regional(RegionalTable),
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        match self {
            RawTable::TimeSeries(table) => table.dates.is_empty() || table.series.is_empty(),
            RawTable::Regional(table) => table.regions.is_empty() || table.series.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendQuery {
    pub keywords: Vec<String>,
    pub category_id: u32,
    pub timeframe: Timeframe,
    pub geo: String,
}

/// Geographic resolution of a regional query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Region,
    State,
}

impl Resolution {
    /// Google Trends has no separate state level; US states are its `REGION` level.
    pub fn as_provider_str(&self) -> &'static str {
        match self {
            Resolution::Region | Resolution::State => "REGION",
        }
    }
}

/// A widget handed out by the explore call: the request to replay plus its access token.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub request: Value,
    pub token: String,
}

/// Result of the explore handshake for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPayload {
    pub keywords: Vec<String>,
    pub timeline: Option<Widget>,
    pub geo_map: Option<Widget>,
}

#[rocket::async_trait]
pub trait TrendsProvider: Send + Sync {
    async fn build_payload(&self, query: &TrendQuery) -> Result<TrendPayload, ProviderError>;

    async fn interest_over_time(
        &self,
        payload: &TrendPayload,
    ) -> Result<TimeSeriesTable, ProviderError>;

    async fn interest_by_region(
        &self,
        payload: &TrendPayload,
        resolution: Resolution,
    ) -> Result<RegionalTable, ProviderError>;
}

pub struct GoogleTrendsClient {
    client: Client,
    base_url: String,
    host_language: String,
    tz_offset: i32,
}

impl GoogleTrendsClient {
    pub fn new(
        base_url: &str,
        host_language: &str,
        tz_offset: i32,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            host_language: host_language.to_string(),
            tz_offset,
        })
    }

    /// Google hands out the session cookie on the landing page; the API
    /// endpoints answer 429 without it.
    async fn warm_up_session(&self, geo: &str) {
        let url = format!("{}/?geo={}", self.base_url, geo);
        if let Err(e) = self.client.get(&url).send().await {
            debug!("Trends session warm-up failed: {e}");
        }
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(params).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(serde_json::from_str(strip_json_prefix(&body))?)
    }

    async fn widget_data(&self, path: &str, widget: &Widget) -> Result<Value, ProviderError> {
        let params = [
            ("req", widget.request.to_string()),
            ("token", widget.token.clone()),
            ("tz", self.tz_offset.to_string()),
        ];
        self.get_json(path, &params).await
    }
}

#[rocket::async_trait]
impl TrendsProvider for GoogleTrendsClient {
    async fn build_payload(&self, query: &TrendQuery) -> Result<TrendPayload, ProviderError> {
        self.warm_up_session(&query.geo).await;

        let comparison: Vec<Value> = query
            .keywords
            .iter()
            .map(|keyword| {
                json!({
                    "keyword": keyword,
                    "time": query.timeframe.as_str(),
                    "geo": query.geo,
                })
            })
            .collect();
        let request = json!({
            "comparisonItem": comparison,
            "category": query.category_id,
            "property": "",
        });

        let params = [
            ("hl", self.host_language.clone()),
            ("tz", self.tz_offset.to_string()),
            ("req", request.to_string()),
        ];
        let explore = self.get_json("/trends/api/explore", &params).await?;
        let payload = parse_explore(&explore, &query.keywords)?;

        info!(
            "Built trends payload for {:?} (timeline: {}, geo map: {})",
            query.keywords,
            payload.timeline.is_some(),
            payload.geo_map.is_some()
        );
        Ok(payload)
    }

    async fn interest_over_time(
        &self,
        payload: &TrendPayload,
    ) -> Result<TimeSeriesTable, ProviderError> {
        let widget = payload
            .timeline
            .as_ref()
            .ok_or_else(|| ProviderError::Parse("explore returned no TIMESERIES widget".into()))?;

        let data = self
            .widget_data("/trends/api/widgetdata/multiline", widget)
            .await?;
        parse_timeline(&data, &payload.keywords)
    }

    async fn interest_by_region(
        &self,
        payload: &TrendPayload,
        resolution: Resolution,
    ) -> Result<RegionalTable, ProviderError> {
        let widget = payload
            .geo_map
            .as_ref()
            .ok_or_else(|| ProviderError::Parse("explore returned no GEO_MAP widget".into()))?;

        let mut request = widget.request.clone();
        let fields = request
            .as_object_mut()
            .ok_or_else(|| ProviderError::Parse("GEO_MAP request is not an object".into()))?;
        fields.insert("resolution".into(), json!(resolution.as_provider_str()));
        fields.insert("includeLowSearchVolumeGeos".into(), json!(true));
        let widget = Widget {
            request,
            token: widget.token.clone(),
        };

        let data = self
            .widget_data("/trends/api/widgetdata/comparedgeo", &widget)
            .await?;
        parse_geo_map(&data, &payload.keywords)
    }
}

#[derive(Debug, Deserialize)]
struct ExploreWidget {
    id: String,
    token: String,
    request: Value,
}

/// Pick the first TIMESERIES widget and the first GEO_MAP widget; with several
/// keywords the first GEO_MAP is the comparison map.
fn parse_explore(explore: &Value, keywords: &[String]) -> Result<TrendPayload, ProviderError> {
    let widgets = explore
        .get("widgets")
        .cloned()
        .ok_or_else(|| ProviderError::Parse("explore response has no widgets".into()))?;
    let widgets: Vec<ExploreWidget> = serde_json::from_value(widgets)?;

    let mut payload = TrendPayload {
        keywords: keywords.to_vec(),
        timeline: None,
        geo_map: None,
    };
    for widget in widgets {
        let slot = match widget.id.as_str() {
            "TIMESERIES" => &mut payload.timeline,
            "GEO_MAP" => &mut payload.geo_map,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(Widget {
                request: widget.request,
                token: widget.token,
            });
        }
    }
    Ok(payload)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelinePoint {
    time: String,
    #[serde(default)]
    value: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeoPoint {
    geo_name: String,
    #[serde(default)]
    value: Vec<Option<f64>>,
}

fn parse_timeline(data: &Value, keywords: &[String]) -> Result<TimeSeriesTable, ProviderError> {
    let points = data
        .pointer("/default/timelineData")
        .cloned()
        .unwrap_or_else(|| json!([]));
    let points: Vec<TimelinePoint> = serde_json::from_value(points)?;
    let mut rows = points
        .into_iter()
        .map(|point| {
            parse_unix_date(&point.time)
                .map(|date| (date, point.value))
                .ok_or_else(|| ProviderError::Parse(format!("bad timeline timestamp {}", point.time)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    rows.sort_by_key(|(date, _)| *date);

    let mut table = TimeSeriesTable {
        dates: Vec::with_capacity(rows.len()),
        series: keywords
            .iter()
            .map(|keyword| Series {
                label: keyword.clone(),
                values: Vec::with_capacity(rows.len()),
            })
            .collect(),
    };

    for (date, values) in rows {
        // Weekly points never share a date; finer resolutions collapse to the first point of the day.
        if table.dates.last().is_some_and(|last| *last >= date) {
            continue;
        }
        table.dates.push(date);
        for (index, series) in table.series.iter_mut().enumerate() {
            series.values.push(values.get(index).copied().unwrap_or(0));
        }
    }

    if table.dates.is_empty() {
        table.series.clear();
    }
    debug!("Parsed {} timeline rows", table.dates.len());
    Ok(table)
}

fn parse_geo_map(data: &Value, keywords: &[String]) -> Result<RegionalTable, ProviderError> {
    let points = data
        .pointer("/default/geoMapData")
        .cloned()
        .unwrap_or_else(|| json!([]));
    let points: Vec<GeoPoint> = serde_json::from_value(points)?;

    let mut table = RegionalTable {
        regions: Vec::with_capacity(points.len()),
        series: keywords
            .iter()
            .map(|keyword| Series {
                label: keyword.clone(),
                values: Vec::with_capacity(points.len()),
            })
            .collect(),
    };

    for point in points {
        table.regions.push(point.geo_name);
        for (index, series) in table.series.iter_mut().enumerate() {
            series.values.push(point.value.get(index).copied().flatten());
        }
    }

    if table.regions.is_empty() {
        table.series.clear();
    }
    debug!("Parsed {} regional rows", table.regions.len());
    Ok(table)
}
