use crate::models::{
    AnalysisSummary, ChannelOverlapRow, ChannelRow, CorrelationRow, DataQualityRow, GroupRow,
    OverviewRow, Report, SegmentRow, VideoRecord, VideoRow, YearTopVideoRow,
};
use crate::services::classification::{
    ChannelSegment, EmotionRules, TitleKeyword, DEFAULT_VEVO_MARKER,
};
use crate::services::duration::DurationCategory;
use crate::services::engagement::{engagement_distribution, EngagementBucket};
use crate::services::statistics::{group_by, mean, pearson_correlation, top_n, Aggregate};
use crate::services::word_frequency::{top_title_words, StopWordPolicy, WordCount, TITLE_WORD_LIMIT};
use crate::utils::{compare_with_order_int, round2, SortOrder};
use anyhow::Result;
use log::debug;
use serde::Serialize;
use std::collections::HashSet;

pub const DEFAULT_TOP_N: usize = 10;
const UNKNOWN_GROUP: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    Overview,
    TopViewed,
    TopLiked,
    TopEngagement,
    LongestVideos,
    VideosPerYear,
    TopVideoPerYear,
    ChannelViews,
    ChannelVideoCount,
    ChannelEngagement,
    DurationCategories,
    DurationViewCorrelation,
    EngagementDistribution,
    VevoComparison,
    EmotionCategories,
    TitleWords,
    OfficialVideos,
    LivePerformances,
    Remixes,
    Mashups,
    AcousticVersions,
    TrailersAndTeasers,
    OfficialRemixChannels,
    ContentCategories,
    DataQuality,
}

impl Analysis {
    pub const ALL: [Analysis; 25] = [
        Analysis::Overview,
        Analysis::TopViewed,
        Analysis::TopLiked,
        Analysis::TopEngagement,
        Analysis::LongestVideos,
        Analysis::VideosPerYear,
        Analysis::TopVideoPerYear,
        Analysis::ChannelViews,
        Analysis::ChannelVideoCount,
        Analysis::ChannelEngagement,
        Analysis::DurationCategories,
        Analysis::DurationViewCorrelation,
        Analysis::EngagementDistribution,
        Analysis::VevoComparison,
        Analysis::EmotionCategories,
        Analysis::TitleWords,
        Analysis::OfficialVideos,
        Analysis::LivePerformances,
        Analysis::Remixes,
        Analysis::Mashups,
        Analysis::AcousticVersions,
        Analysis::TrailersAndTeasers,
        Analysis::OfficialRemixChannels,
        Analysis::ContentCategories,
        Analysis::DataQuality,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Analysis::Overview => "overview",
            Analysis::TopViewed => "top-viewed",
            Analysis::TopLiked => "top-liked",
            Analysis::TopEngagement => "top-engagement",
            Analysis::LongestVideos => "longest-videos",
            Analysis::VideosPerYear => "videos-per-year",
            Analysis::TopVideoPerYear => "top-video-per-year",
            Analysis::ChannelViews => "channel-views",
            Analysis::ChannelVideoCount => "channel-video-count",
            Analysis::ChannelEngagement => "channel-engagement",
            Analysis::DurationCategories => "duration-categories",
            Analysis::DurationViewCorrelation => "duration-view-correlation",
            Analysis::EngagementDistribution => "engagement-distribution",
            Analysis::VevoComparison => "vevo-comparison",
            Analysis::EmotionCategories => "emotion-categories",
            Analysis::TitleWords => "title-words",
            Analysis::OfficialVideos => "official-videos",
            Analysis::LivePerformances => "live-performances",
            Analysis::Remixes => "remixes",
            Analysis::Mashups => "mashups",
            Analysis::AcousticVersions => "acoustic-versions",
            Analysis::TrailersAndTeasers => "trailers-and-teasers",
            Analysis::OfficialRemixChannels => "official-remix-channels",
            Analysis::ContentCategories => "content-categories",
            Analysis::DataQuality => "data-quality",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Analysis::Overview => "Dataset overview",
            Analysis::TopViewed => "Most viewed videos",
            Analysis::TopLiked => "Most liked videos",
            Analysis::TopEngagement => "Highest engagement rate",
            Analysis::LongestVideos => "Longest videos",
            Analysis::VideosPerYear => "Videos and average reach per year",
            Analysis::TopVideoPerYear => "Most viewed video of each year",
            Analysis::ChannelViews => "Channels by total views",
            Analysis::ChannelVideoCount => "Channels by number of videos",
            Analysis::ChannelEngagement => "Channels by average engagement rate",
            Analysis::DurationCategories => "Performance by duration",
            Analysis::DurationViewCorrelation => "Correlation of duration and views",
            Analysis::EngagementDistribution => "Engagement rate distribution",
            Analysis::VevoComparison => "VEVO vs non-VEVO channels",
            Analysis::EmotionCategories => "Emotional tone of descriptions",
            Analysis::TitleWords => "Most common title words",
            Analysis::OfficialVideos => "Official videos",
            Analysis::LivePerformances => "Live performances",
            Analysis::Remixes => "Remixes",
            Analysis::Mashups => "Mashups",
            Analysis::AcousticVersions => "Acoustic versions",
            Analysis::TrailersAndTeasers => "Trailers and teasers",
            Analysis::OfficialRemixChannels => "Channels with both official videos and remixes",
            Analysis::ContentCategories => "Videos per content category",
            Analysis::DataQuality => "Missing and malformed fields",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Analysis::ALL.into_iter().find(|a| a.slug() == slug)
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            slug: self.slug().to_string(),
            title: self.title().to_string(),
        }
    }
}

/// Tunable heuristics of the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerSettings {
    pub stop_words: StopWordPolicy,
    pub emotions: EmotionRules,
    pub vevo_marker: String,
    pub default_top_n: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        AnalyzerSettings {
            stop_words: StopWordPolicy::default(),
            emotions: EmotionRules::default(),
            vevo_marker: DEFAULT_VEVO_MARKER.to_string(),
            default_top_n: DEFAULT_TOP_N,
        }
    }
}

/// Read-only analytics over one loaded dataset.
pub struct VideoMetricsAnalyzer {
    records: Vec<VideoRecord>,
    settings: AnalyzerSettings,
}

impl VideoMetricsAnalyzer {
    pub fn new(records: Vec<VideoRecord>, settings: AnalyzerSettings) -> Self {
        VideoMetricsAnalyzer { records, settings }
    }

    pub fn run(&self, analysis: Analysis, limit: Option<usize>) -> Result<Report> {
        debug!("Running analysis {} (limit {:?})", analysis.slug(), limit);
        let n = limit.unwrap_or(self.settings.default_top_n);

        match analysis {
            Analysis::Overview => table(analysis, vec![self.overview()]),
            Analysis::TopViewed => table(analysis, self.top_viewed(n)),
            Analysis::TopLiked => table(analysis, self.top_liked(n)),
            Analysis::TopEngagement => table(analysis, self.top_engagement(n)),
            Analysis::LongestVideos => table(analysis, self.longest_videos(n)),
            Analysis::VideosPerYear => table(analysis, self.videos_per_year()),
            Analysis::TopVideoPerYear => table(analysis, self.top_video_per_year()),
            Analysis::ChannelViews => table(analysis, self.channels_by_views(n)),
            Analysis::ChannelVideoCount => table(analysis, self.channels_by_video_count(n)),
            Analysis::ChannelEngagement => table(analysis, self.channels_by_engagement(n)),
            Analysis::DurationCategories => table(analysis, self.duration_categories()),
            Analysis::DurationViewCorrelation => {
                table(analysis, vec![self.duration_view_correlation()])
            }
            Analysis::EngagementDistribution => table(analysis, self.engagement_distribution()),
            Analysis::VevoComparison => table(analysis, self.vevo_comparison()),
            Analysis::EmotionCategories => table(analysis, self.emotion_categories()),
            Analysis::TitleWords => {
                table(analysis, self.title_words(limit.unwrap_or(TITLE_WORD_LIMIT)))
            }
            Analysis::OfficialVideos => {
                table(analysis, self.keyword_videos(&[TitleKeyword::Official], n))
            }
            Analysis::LivePerformances => {
                table(analysis, self.keyword_videos(&[TitleKeyword::Live], n))
            }
            Analysis::Remixes => table(analysis, self.keyword_videos(&[TitleKeyword::Remix], n)),
            Analysis::Mashups => table(analysis, self.keyword_videos(&[TitleKeyword::Mashup], n)),
            Analysis::AcousticVersions => {
                table(analysis, self.keyword_videos(&[TitleKeyword::Acoustic], n))
            }
            Analysis::TrailersAndTeasers => table(
                analysis,
                self.keyword_videos(&[TitleKeyword::Trailer, TitleKeyword::Teaser], n),
            ),
            Analysis::OfficialRemixChannels => table(analysis, self.official_remix_channels()),
            Analysis::ContentCategories => table(analysis, self.content_categories()),
            Analysis::DataQuality => table(analysis, vec![self.data_quality()]),
        }
    }

    pub fn run_all(&self) -> Result<Vec<Report>> {
        Analysis::ALL
            .iter()
            .map(|analysis| self.run(*analysis, None))
            .collect()
    }

    pub fn overview(&self) -> OverviewRow {
        let views = Aggregate::over(self.records.iter().map(|r| r.view_count));
        let likes = Aggregate::over(self.records.iter().map(|r| r.like_count));
        let channels: HashSet<&str> = self
            .records
            .iter()
            .map(channel_key)
            .collect();

        OverviewRow {
            videos: self.records.len(),
            channels: channels.len(),
            total_views: views.sum,
            total_likes: likes.sum,
            avg_views: views.mean().map(round2),
            avg_likes: likes.mean().map(round2),
        }
    }

    pub fn top_viewed(&self, n: usize) -> Vec<VideoRow> {
        self.top_videos(self.records.iter(), n, |r| r.view_count.map(|v| v as f64))
    }

    pub fn top_liked(&self, n: usize) -> Vec<VideoRow> {
        self.top_videos(self.records.iter(), n, |r| r.like_count.map(|v| v as f64))
    }

    pub fn top_engagement(&self, n: usize) -> Vec<VideoRow> {
        self.top_videos(self.records.iter(), n, |r| r.engagement().numeric())
    }

    pub fn longest_videos(&self, n: usize) -> Vec<VideoRow> {
        self.top_videos(self.records.iter(), n, |r| r.duration_minutes())
    }

    /// Years ascending, records without a publish date last.
    pub fn videos_per_year(&self) -> Vec<GroupRow> {
        self.by_year()
            .into_iter()
            .map(|(year, records)| group_row(year_label(year), &records))
            .collect()
    }

    pub fn top_video_per_year(&self) -> Vec<YearTopVideoRow> {
        self.by_year()
            .into_iter()
            .filter_map(|(year, records)| {
                let top = top_n(records.iter().copied(), 1, |r| {
                    r.view_count.map(|v| v as f64)
                });
                // a year without any view counts still gets its first video
                let pick = top.first().or(records.first()).copied();
                pick.map(|record| YearTopVideoRow {
                    year: year_label(year),
                    video: VideoRow::from(record),
                })
            })
            .collect()
    }

    pub fn channels_by_views(&self, n: usize) -> Vec<ChannelRow> {
        top_n(self.channel_rows(), n, |row| Some(row.total_views as f64))
    }

    pub fn channels_by_video_count(&self, n: usize) -> Vec<ChannelRow> {
        top_n(self.channel_rows(), n, |row| Some(row.videos as f64))
    }

    pub fn channels_by_engagement(&self, n: usize) -> Vec<ChannelRow> {
        top_n(self.channel_rows(), n, |row| row.avg_engagement)
    }

    pub fn duration_categories(&self) -> Vec<GroupRow> {
        let mut groups = group_by(self.records.iter(), |r| r.duration_category());
        groups.sort_by_key(|(category, _)| {
            DurationCategory::ALL
                .iter()
                .position(|c| c == category)
                .unwrap_or(DurationCategory::ALL.len())
        });

        groups
            .into_iter()
            .map(|(category, records)| group_row(category.label().to_string(), &records))
            .collect()
    }

    pub fn duration_view_correlation(&self) -> CorrelationRow {
        let points: Vec<(f64, f64)> = self
            .records
            .iter()
            .filter_map(|r| Some((r.duration_minutes()?, r.view_count? as f64)))
            .collect();

        CorrelationRow {
            points: points.len(),
            correlation: pearson_correlation(&points).map(round2),
        }
    }

    pub fn engagement_distribution(&self) -> Vec<EngagementBucket> {
        engagement_distribution(self.records.iter().map(|r| r.engagement()))
    }

    /// VEVO first, then everyone else.
    pub fn vevo_comparison(&self) -> Vec<SegmentRow> {
        let marker = self.settings.vevo_marker.as_str();
        let mut groups = group_by(self.records.iter(), |r| {
            ChannelSegment::classify(&r.channel_name, marker)
        });
        groups.sort_by_key(|(segment, _)| *segment != ChannelSegment::Vevo);

        groups
            .into_iter()
            .map(|(segment, records)| {
                let views = Aggregate::over(records.iter().map(|r| r.view_count));
                let likes = Aggregate::over(records.iter().map(|r| r.like_count));
                SegmentRow {
                    segment: segment.label().to_string(),
                    videos: records.len(),
                    avg_views: views.mean().map(round2),
                    avg_likes: likes.mean().map(round2),
                    avg_engagement: average_engagement(&records),
                }
            })
            .collect()
    }

    /// Emotions in rule priority order, `Other` last.
    pub fn emotion_categories(&self) -> Vec<GroupRow> {
        let emotions = &self.settings.emotions;
        let order = emotions.labels();
        let mut groups = group_by(self.records.iter(), |r| {
            emotions.classify(r.description.as_deref())
        });
        groups.sort_by_key(|(emotion, _)| {
            order
                .iter()
                .position(|label| label == emotion)
                .unwrap_or(order.len())
        });

        groups
            .into_iter()
            .map(|(emotion, records)| group_row(emotion.to_string(), &records))
            .collect()
    }

    pub fn title_words(&self, limit: usize) -> Vec<WordCount> {
        top_title_words(
            self.records.iter().map(|r| r.title.as_str()),
            self.settings.stop_words,
            limit,
        )
    }

    /// Videos whose title contains any of the keywords, most viewed first.
    pub fn keyword_videos(&self, keywords: &[TitleKeyword], n: usize) -> Vec<VideoRow> {
        let matching = self
            .records
            .iter()
            .filter(|r| keywords.iter().any(|k| k.matches(&r.title)));
        self.top_videos(matching, n, |r| r.view_count.map(|v| v as f64))
    }

    /// Channels that appear in both the "official" and the "remix" title filter.
    pub fn official_remix_channels(&self) -> Vec<ChannelOverlapRow> {
        let mut rows: Vec<ChannelOverlapRow> = group_by(self.records.iter(), |r| channel_key(*r))
        .into_iter()
        .map(|(channel, records)| ChannelOverlapRow {
            channel_name: channel.to_string(),
            official_videos: count_matching(&records, TitleKeyword::Official),
            remix_videos: count_matching(&records, TitleKeyword::Remix),
        })
        .filter(|row| row.official_videos > 0 && row.remix_videos > 0)
        .collect();

        rows.sort_by(|a, b| {
            compare_with_order_int(
                (a.official_videos + a.remix_videos) as i64,
                (b.official_videos + b.remix_videos) as i64,
                &SortOrder::Desc,
            )
        });
        rows
    }

    /// Largest categories first, missing category grouped as `Unknown`.
    pub fn content_categories(&self) -> Vec<GroupRow> {
        let mut groups = group_by(self.records.iter(), |r| {
            r.category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(UNKNOWN_GROUP)
        });
        groups.sort_by(|(_, a), (_, b)| {
            compare_with_order_int(a.len() as i64, b.len() as i64, &SortOrder::Desc)
        });

        groups
            .into_iter()
            .map(|(category, records)| group_row(category.to_string(), &records))
            .collect()
    }

    pub fn data_quality(&self) -> DataQualityRow {
        let count = |predicate: fn(&VideoRecord) -> bool| {
            self.records.iter().filter(|r| predicate(r)).count()
        };

        DataQualityRow {
            videos: self.records.len(),
            missing_publish_date: count(|r| r.publish_date.is_none()),
            missing_views: count(|r| r.view_count.is_none()),
            missing_likes: count(|r| r.like_count.is_none()),
            unparseable_duration: count(|r| r.duration_minutes().is_none()),
        }
    }

    fn top_videos<'a, I, F>(&self, records: I, n: usize, key: F) -> Vec<VideoRow>
    where
        I: Iterator<Item = &'a VideoRecord>,
        F: Fn(&VideoRecord) -> Option<f64>,
    {
        top_n(records, n, |r| key(r))
            .into_iter()
            .map(VideoRow::from)
            .collect()
    }

    fn by_year(&self) -> Vec<(Option<i32>, Vec<&VideoRecord>)> {
        let mut groups = group_by(self.records.iter(), |r| r.publish_year());
        // None sorts last
        groups.sort_by_key(|(year, _)| (year.is_none(), *year));
        groups
    }

    fn channel_rows(&self) -> Vec<ChannelRow> {
        group_by(self.records.iter(), |r| channel_key(*r))
            .into_iter()
            .map(|(channel, records)| {
                let views = Aggregate::over(records.iter().map(|r| r.view_count));
                ChannelRow {
                    channel_name: channel.to_string(),
                    videos: records.len(),
                    total_views: views.sum,
                    avg_views: views.mean().map(round2),
                    avg_engagement: average_engagement(&records),
                }
            })
            .collect()
    }
}

fn table<T: Serialize>(analysis: Analysis, rows: Vec<T>) -> Result<Report> {
    let rows = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Report {
        analysis: analysis.slug().to_string(),
        title: analysis.title().to_string(),
        rows,
    })
}

fn group_row(group: String, records: &[&VideoRecord]) -> GroupRow {
    let views = Aggregate::over(records.iter().map(|r| r.view_count));
    let likes = Aggregate::over(records.iter().map(|r| r.like_count));
    GroupRow {
        group,
        videos: records.len(),
        avg_views: views.mean().map(round2),
        avg_likes: likes.mean().map(round2),
    }
}

/// Mean rate over videos with views; `No Likes` counts as 0.
fn average_engagement(records: &[&VideoRecord]) -> Option<f64> {
    mean(records.iter().filter_map(|r| r.engagement().value())).map(round2)
}

fn count_matching(records: &[&VideoRecord], keyword: TitleKeyword) -> usize {
    records.iter().filter(|r| keyword.matches(&r.title)).count()
}

/// Channel grouping key, blank names fall into `Unknown`.
fn channel_key(record: &VideoRecord) -> &str {
    let channel = record.channel_name.trim();
    if channel.is_empty() {
        UNKNOWN_GROUP
    } else {
        channel
    }
}

fn year_label(year: Option<i32>) -> String {
    year.map(|y| y.to_string())
        .unwrap_or_else(|| UNKNOWN_GROUP.to_string())
}
