//! The sixteen musicbrainz search cores (`spec.md` §3), transcribed from
//! `original_source/sir/schema/__init__.py`'s `SCHEMA` mapping.
//!
//! Field names, paths, transforms and trigger flags are carried over
//! unchanged in meaning; only the declaration syntax is native Rust.

use std::sync::Arc;

use mbsearch_paths::Path;

use crate::entity::{EntityDescriptor, ExtraQueryPredicate, Serializer};
use crate::field::FieldDescriptor;
use crate::musicbrainz::serializer::JsonDocumentSerializer;
use crate::transform::Transform;

const BOOST: f64 = 1.5;

fn serializer() -> Arc<dyn Serializer> {
    Arc::new(JsonDocumentSerializer)
}

fn field(name: &str, path: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, path)
}

fn fan(name: &str, paths: &[&str]) -> FieldDescriptor {
    FieldDescriptor::fanned_out(name, paths.iter().map(|p| Path::new(*p)).collect())
}

fn paths(raw: &[&str]) -> Vec<Path> {
    raw.iter().map(|p| Path::new(*p)).collect()
}

/// `spec.md` §3 "extra-query predicate": annotations whose owning entity has
/// since been deleted are dropped from the index rather than re-indexed as
/// orphans (original `sir.schema.queryext.filter_valid_annotations`).
#[derive(Debug)]
pub struct ValidAnnotationsOnly;

impl ExtraQueryPredicate for ValidAnnotationsOnly {
    fn name(&self) -> &'static str {
        "valid_annotations_only"
    }
}

fn annotation() -> EntityDescriptor {
    EntityDescriptor::new("annotation", BOOST, serializer())
        .with_fields(vec![
            field("id", "id"),
            fan(
                "entity",
                &[
                    "areas.area.gid",
                    "artists.artist.gid",
                    "events.event.gid",
                    "instruments.instrument.gid",
                    "labels.label.gid",
                    "places.place.gid",
                    "recordings.recording.gid",
                    "releases.release.gid",
                    "release_groups.release_group.gid",
                    "series.series.gid",
                    "works.work.gid",
                ],
            ),
            fan(
                "name",
                &[
                    "areas.area.name",
                    "artists.artist.name",
                    "events.event.name",
                    "instruments.instrument.name",
                    "labels.label.name",
                    "places.place.name",
                    "recordings.recording.name",
                    "releases.release.name",
                    "release_groups.release_group.name",
                    "series.series.name",
                    "works.work.name",
                ],
            ),
            field("text", "text"),
            fan(
                "type",
                &[
                    "areas.__tablename__",
                    "artists.__tablename__",
                    "events.__tablename__",
                    "instruments.__tablename__",
                    "labels.__tablename__",
                    "places.__tablename__",
                    "recordings.__tablename__",
                    "releases.__tablename__",
                    "release_groups.__tablename__",
                    "series.__tablename__",
                    "works.__tablename__",
                ],
            )
            .with_transform(Transform::AnnotationType),
        ])
        .with_extra_query(Arc::new(ValidAnnotationsOnly))
}

fn area() -> EntityDescriptor {
    EntityDescriptor::new("area", BOOST, serializer())
        .with_fields(vec![
            field("mbid", "gid"),
            field("area", "name"),
            field("alias", "aliases.name"),
            field("comment", "comment"),
            field("begin", "begin_date").with_transform(Transform::IndexPartialDateToString),
            field("end", "end_date").with_transform(Transform::IndexPartialDateToString),
            field("ended", "ended").with_transform(Transform::EndedToString),
            field("iso1", "iso_3166_1_codes.code"),
            field("iso2", "iso_3166_2_codes.code"),
            field("iso3", "iso_3166_3_codes.code"),
            field("sortname", "aliases.sort_name"),
            fan("ref_count", &["place_count", "label_count", "artist_count"])
                .with_transform(Transform::IntegerSum)
                .no_trigger(),
            field("tag", "tags.tag.name"),
            field("type", "type.name"),
        ])
        .with_extra_paths(paths(&[
            "aliases.type.name",
            "aliases.type.id",
            "aliases.sort_name",
            "aliases.type.gid",
            "aliases.locale",
            "aliases.primary_for_locale",
            "aliases.begin_date",
            "aliases.end_date",
            "area_links.area0.name",
            "area_links.area0.gid",
            "area_links.area0.begin_date",
            "area_links.area0.end_date",
            "area_links.area0.type.id",
            "area_links.area0.type.gid",
            "area_links.link.link_type.name",
            "area_links.link.link_type.gid",
            "area_links.link.attributes.attribute_type.name",
            "area_links.link.attributes.attribute_type.gid",
            "tags.count",
            "type.gid",
        ]))
}

fn artist() -> EntityDescriptor {
    EntityDescriptor::new("artist", BOOST, serializer())
        .with_fields(vec![
            field("mbid", "gid"),
            field("artist", "name"),
            field("sortname", "sort_name"),
            field("alias", "aliases.name"),
            field("primary_alias", "primary_aliases").no_trigger(),
            field("begin", "begin_date").with_transform(Transform::IndexPartialDateToString),
            field("end", "end_date").with_transform(Transform::IndexPartialDateToString),
            field("ended", "ended").with_transform(Transform::EndedToString),
            fan("area", &["area.name", "area.aliases.name"]),
            fan("beginarea", &["begin_area.name", "begin_area.aliases.name"]),
            field("country", "area.iso_3166_1_codes.code"),
            fan("endarea", &["end_area.name", "end_area.aliases.name"]),
            field("ref_count", "artist_credit_names.artist_credit.ref_count")
                .with_transform(Transform::Sum)
                .no_trigger(),
            field("comment", "comment"),
            field("gender", "gender.name"),
            field("ipi", "ipis.ipi"),
            field("isni", "isnis.isni"),
            field("tag", "tags.tag.name"),
            field("type", "type.name"),
        ])
        .with_extra_paths(paths(&[
            "tags.count",
            "aliases.type.name",
            "aliases.type.id",
            "aliases.type.gid",
            "aliases.sort_name",
            "aliases.locale",
            "aliases.primary_for_locale",
            "aliases.begin_date",
            "aliases.end_date",
            "begin_area.gid",
            "area.gid",
            "end_area.gid",
            "gender.gid",
            "type.gid",
        ]))
}

fn cdstub() -> EntityDescriptor {
    EntityDescriptor::new("release_raw", BOOST, serializer()).with_fields(vec![
        field("id", "id"),
        field("title", "title"),
        field("artist", "artist"),
        field("comment", "comment"),
        field("barcode", "barcode"),
        field("added", "added"),
        field("tracks", "discids.track_count"),
        field("discid", "discids.discid"),
    ])
}

fn editor() -> EntityDescriptor {
    EntityDescriptor::new("editor", BOOST, serializer()).with_fields(vec![
        field("id", "id"),
        field("bio", "bio"),
        field("editor", "name"),
    ])
}

fn event() -> EntityDescriptor {
    EntityDescriptor::new("event", BOOST, serializer())
        .with_fields(vec![
            field("mbid", "gid"),
            field("alias", "aliases.name"),
            field("aid", "area_links.entity0.gid"),
            field("area", "area_links.entity0.name"),
            field("arid", "artist_links.entity0.gid"),
            field("artist", "artist_links.entity0.name"),
            field("pid", "place_links.entity1.gid"),
            field("place", "place_links.entity1.name"),
            field("comment", "comment"),
            field("event", "name"),
            field("tag", "tags.tag.name"),
            field("type", "type.name"),
            field("begin", "begin_date").with_transform(Transform::IndexPartialDateToString),
            field("ended", "ended").with_transform(Transform::EndedToString),
            field("end", "end_date").with_transform(Transform::IndexPartialDateToString),
        ])
        .with_extra_paths(paths(&[
            "aliases.type.name",
            "aliases.type.id",
            "aliases.type.gid",
            "aliases.sort_name",
            "aliases.locale",
            "aliases.primary_for_locale",
            "aliases.begin_date",
            "aliases.end_date",
            "area_links.area.name",
            "area_links.area.gid",
            "area_links.link.link_type.name",
            "area_links.link.link_type.gid",
            "area_links.link.attributes.attribute_type.name",
            "area_links.link.attributes.attribute_type.gid",
            "artist_links.artist.gid",
            "artist_links.artist.name",
            "artist_links.artist.comment",
            "artist_links.link.link_type.name",
            "artist_links.link.link_type.gid",
            "artist_links.link.attributes.attribute_type.name",
            "artist_links.link.attributes.attribute_type.gid",
            "place_links.place.gid",
            "place_links.place.name",
            "place_links.link.link_type.name",
            "place_links.link.link_type.gid",
            "place_links.link.attributes.attribute_type.name",
            "place_links.link.attributes.attribute_type.gid",
            "tags.count",
            "type.gid",
            "time",
        ]))
}

fn instrument() -> EntityDescriptor {
    EntityDescriptor::new("instrument", BOOST, serializer())
        .with_fields(vec![
            field("alias", "aliases.name"),
            field("comment", "comment"),
            field("description", "description"),
            field("mbid", "gid"),
            field("instrument", "name"),
            field("tag", "tags.tag.name"),
            field("type", "type.name"),
        ])
        .with_extra_paths(paths(&[
            "aliases.type.name",
            "aliases.type.id",
            "aliases.sort_name",
            "aliases.type.gid",
            "aliases.locale",
            "aliases.primary_for_locale",
            "aliases.begin_date",
            "aliases.end_date",
            "tags.count",
            "type.gid",
        ]))
}

fn label() -> EntityDescriptor {
    EntityDescriptor::new("label", BOOST, serializer())
        .with_fields(vec![
            field("mbid", "gid"),
            field("label", "name"),
            field("alias", "aliases.name"),
            fan("area", &["area.name", "area.aliases.name"]),
            field("country", "area.iso_3166_1_codes.code"),
            field("begin", "begin_date").with_transform(Transform::IndexPartialDateToString),
            field("end", "end_date").with_transform(Transform::IndexPartialDateToString),
            field("ended", "ended").with_transform(Transform::EndedToString),
            field("code", "label_code"),
            field("comment", "comment"),
            field("release_count", "release_count")
                .with_transform(Transform::IntegerSum)
                .no_trigger(),
            field("sortname", "aliases.sort_name"),
            field("ipi", "ipis.ipi"),
            field("isni", "isnis.isni"),
            field("tag", "tags.tag.name"),
            field("type", "type.name"),
        ])
        .with_extra_paths(paths(&[
            "aliases.type.name",
            "aliases.type.id",
            "aliases.type.gid",
            "aliases.sort_name",
            "aliases.locale",
            "aliases.primary_for_locale",
            "aliases.begin_date",
            "aliases.end_date",
            "area.gid",
            "area.type.name",
            "area.type.gid",
            "tags.count",
            "type.gid",
        ]))
}

fn place() -> EntityDescriptor {
    EntityDescriptor::new("place", BOOST, serializer())
        .with_fields(vec![
            field("mbid", "gid"),
            field("address", "address"),
            field("alias", "aliases.name"),
            fan("area", &["area.name", "area.aliases.name"]),
            field("begin", "begin_date").with_transform(Transform::IndexPartialDateToString),
            field("comment", "comment"),
            field("end", "end_date").with_transform(Transform::IndexPartialDateToString),
            field("ended", "ended").with_transform(Transform::EndedToString),
            field("lat", "coordinates").with_transform(Transform::Lat),
            field("long", "coordinates").with_transform(Transform::Long),
            field("place", "name"),
            field("type", "type.name"),
        ])
        .with_extra_paths(paths(&[
            "aliases.type.name",
            "aliases.type.id",
            "aliases.type.gid",
            "aliases.sort_name",
            "aliases.locale",
            "aliases.primary_for_locale",
            "aliases.begin_date",
            "aliases.end_date",
            "area.gid",
            "type.gid",
        ]))
}

fn recording() -> EntityDescriptor {
    EntityDescriptor::new("recording", BOOST, serializer())
        .with_fields(vec![
            field("alias", "aliases.name"),
            field("arid", "artist_credit.artists.artist.gid"),
            field("artist", "artist_credit.name"),
            field("artistname", "artist_credit.artists.artist.name"),
            field("comment", "comment"),
            field(
                "country",
                "tracks.medium.release.country_dates.country.area.iso_3166_1_codes.code",
            ),
            field("creditname", "artist_credit.artists.name"),
            field("date", "tracks.medium.release.country_dates.date")
                .with_transform(Transform::IndexPartialDateToString),
            field("dur", "length"),
            field("format", "tracks.medium.format.name"),
            field("isrc", "isrcs.isrc"),
            field("mbid", "gid"),
            field("number", "tracks.number"),
            field("position", "tracks.medium.position"),
            field("primarytype", "tracks.medium.release.release_group.type.name"),
            field("qdur", "length").with_transform(Transform::Qdur),
            field("recording", "name"),
            field("reid", "tracks.medium.release.gid"),
            field("release", "tracks.medium.release.name"),
            field("rgid", "tracks.medium.release.release_group.gid"),
            field(
                "secondarytype",
                "tracks.medium.release.release_group.secondary_types.secondary_type.name",
            ),
            field("status", "tracks.medium.release.status.name"),
            field("tag", "tags.tag.name"),
            field("tid", "tracks.gid"),
            field("tnum", "tracks.position"),
            field("tracks", "tracks.medium.track_count"),
            field("tracksrelease", "tracks.medium.release.mediums.track_count")
                .with_transform(Transform::Sum),
            field("video", "video").with_transform(Transform::Boolean),
        ])
        .with_extra_paths(paths(&[
            "artist_credit.artists.artist.aliases.begin_date",
            "artist_credit.artists.artist.aliases.end_date",
            "artist_credit.artists.artist.aliases.locale",
            "artist_credit.artists.artist.aliases.name",
            "artist_credit.artists.artist.aliases.primary_for_locale",
            "artist_credit.artists.artist.aliases.sort_name",
            "artist_credit.artists.artist.aliases.type.id",
            "artist_credit.artists.artist.aliases.type.name",
            "artist_credit.artists.artist.aliases.type.gid",
            "artist_credit.artists.artist.comment",
            "artist_credit.artists.artist.gid",
            "artist_credit.artists.artist.name",
            "artist_credit.artists.artist.sort_name",
            "artist_credit.artists.join_phrase",
            "artist_credit.artists.name",
            "artist_credit.name",
            "tags.count",
            "tags.tag.name",
            "tracks.length",
            "tracks.medium.cdtocs.id",
            "tracks.medium.release.artist_credit.artists.artist.comment",
            "tracks.medium.release.artist_credit.artists.artist.gid",
            "tracks.medium.release.artist_credit.artists.artist.name",
            "tracks.medium.release.artist_credit.artists.artist.sort_name",
            "tracks.medium.release.artist_credit.artists.join_phrase",
            "tracks.medium.release.artist_credit.artists.name",
            "tracks.medium.release.artist_credit.name",
            "tracks.medium.release.comment",
            "tracks.medium.release.country_dates.country.area.gid",
            "tracks.medium.release.country_dates.country.area.iso_3166_1_codes.code",
            "tracks.medium.release.country_dates.country.area.name",
            "tracks.medium.release.country_dates.date_day",
            "tracks.medium.release.country_dates.date_month",
            "tracks.medium.release.country_dates.date_year",
            "tracks.medium.release.release_group.comment",
            "tracks.medium.release.release_group.name",
            "tracks.medium.release.release_group.type.gid",
            "tracks.medium.release.release_group.secondary_types.secondary_type.gid",
            "tracks.medium.release.status.gid",
            "tracks.name",
        ]))
}

fn release() -> EntityDescriptor {
    EntityDescriptor::new("release", BOOST, serializer())
        .with_fields(vec![
            field("mbid", "gid"),
            field("release", "name"),
            field("alias", "aliases.name"),
            field("arid", "artist_credit.artists.artist.gid"),
            field("artist", "artist_credit.name"),
            field("artistname", "artist_credit.artists.artist.name"),
            field("asin", "asin.amazon_asin"),
            field("creditname", "artist_credit.artists.name"),
            field("country", "country_dates.country.area.iso_3166_1_codes.code"),
            field("date", "country_dates.date").with_transform(Transform::IndexPartialDateToString),
            field("barcode", "barcode").with_transform(Transform::FillNone),
            field("catno", "labels.catalog_number"),
            field("comment", "comment"),
            field("format", "mediums.format.name"),
            field("laid", "labels.label.gid"),
            field("label", "labels.label.name"),
            field("lang", "language.iso_code_3"),
            field("mediums", "medium_count")
                .with_transform(Transform::IntegerSum)
                .no_trigger(),
            field("primarytype", "release_group.type.name"),
            field("quality", "quality"),
            field("rgid", "release_group.gid"),
            field("script", "script.iso_code"),
            field("secondarytype", "release_group.secondary_types.secondary_type.name"),
            field("status", "status.name"),
            field("tracks", "mediums.track_count").with_transform(Transform::Sum),
            field("tracksmedium", "mediums.track_count"),
            field("tag", "tags.tag.name"),
        ])
        .with_extra_paths(paths(&[
            "artist_credit.artists.join_phrase",
            "artist_credit.artists.artist.aliases.begin_date",
            "artist_credit.artists.artist.aliases.end_date",
            "artist_credit.artists.artist.aliases.locale",
            "artist_credit.artists.artist.aliases.name",
            "artist_credit.artists.artist.aliases.primary_for_locale",
            "artist_credit.artists.artist.aliases.sort_name",
            "artist_credit.artists.artist.aliases.type.id",
            "artist_credit.artists.artist.aliases.type.name",
            "artist_credit.artists.artist.aliases.type.gid",
            "artist_credit.artists.artist.gid",
            "artist_credit.artists.artist.sort_name",
            "country_dates.country.area.gid",
            "country_dates.country.area.name",
            "country_dates.country.area.iso_3166_1_codes.code",
            "country_dates.date_day",
            "country_dates.date_month",
            "country_dates.date_year",
            "mediums.cdtocs.id",
            "packaging.name",
            "release_group.comment",
            "release_group.name",
            "release_group.type.gid",
            "release_group.secondary_types.secondary_type.gid",
            "status.gid",
            "language.iso_code_3",
            "tags.count",
        ]))
}

fn release_group() -> EntityDescriptor {
    EntityDescriptor::new("release_group", BOOST, serializer())
        .with_fields(vec![
            field("mbid", "gid"),
            field("releasegroup", "name"),
            field("alias", "aliases.name"),
            field("arid", "artist_credit.artists.artist.gid"),
            field("artist", "artist_credit.name"),
            field("artistname", "artist_credit.artists.artist.name"),
            field("creditname", "artist_credit.artists.name"),
            field("release", "releases.name"),
            field("reid", "releases.gid"),
            field("releases", "release_count")
                .with_transform(Transform::IntegerSum)
                .no_trigger(),
            field("status", "releases.status.name"),
            field("comment", "comment"),
            field("tag", "tags.tag.name"),
            field("primarytype", "type.name"),
            field("secondarytype", "secondary_types.secondary_type.name"),
        ])
        .with_extra_paths(paths(&[
            "artist_credit.artists.join_phrase",
            "artist_credit.artists.artist.aliases.begin_date",
            "artist_credit.artists.artist.aliases.end_date",
            "artist_credit.artists.artist.aliases.locale",
            "artist_credit.artists.artist.aliases.name",
            "artist_credit.artists.artist.aliases.primary_for_locale",
            "artist_credit.artists.artist.aliases.sort_name",
            "artist_credit.artists.artist.aliases.type.id",
            "artist_credit.artists.artist.aliases.type.name",
            "artist_credit.artists.artist.gid",
            "artist_credit.artists.artist.sort_name",
            "artist_credit.artists.artist.comment",
            "tags.count",
            "type.gid",
            "releases.status.gid",
            "secondary_types.secondary_type.gid",
        ]))
}

fn series() -> EntityDescriptor {
    EntityDescriptor::new("series", BOOST, serializer())
        .with_fields(vec![
            field("mbid", "gid"),
            field("alias", "aliases.name"),
            field("comment", "comment"),
            field("orderingattribute", "link_attribute_type.name"),
            field("series", "name"),
            field("tag", "tags.tag.name"),
            field("type", "type.name"),
        ])
        .with_extra_paths(paths(&[
            "tags.count",
            "aliases.type.name",
            "aliases.type.id",
            "aliases.type.gid",
            "aliases.sort_name",
            "aliases.locale",
            "aliases.primary_for_locale",
            "aliases.begin_date",
            "aliases.end_date",
            "type.gid",
        ]))
}

fn tag() -> EntityDescriptor {
    EntityDescriptor::new("tag", BOOST, serializer())
        .with_fields(vec![field("id", "id"), field("tag", "name")])
}

fn url() -> EntityDescriptor {
    EntityDescriptor::new("url", BOOST, serializer())
        .with_fields(vec![
            field("mbid", "gid"),
            field("url", "url"),
            fan(
                "relationtype",
                &["artist_links.link.link_type.name", "release_links.link.link_type.name"],
            ),
            fan("targetid", &["artist_links.artist.gid", "release_links.release.gid"]),
            fan("targettype", &["artist_links.__tablename__", "release_links.__tablename__"])
                .with_transform(Transform::UrlType),
        ])
        .with_extra_paths(paths(&[
            "artist_links.artist.gid",
            "artist_links.artist.name",
            "artist_links.artist.comment",
            "artist_links.artist.sort_name",
            "artist_links.link.link_type.name",
            "artist_links.link.link_type.gid",
            "artist_links.link.attributes.attribute_type.name",
            "artist_links.link.attributes.attribute_type.gid",
            "release_links.release.gid",
            "release_links.release.name",
            "release_links.release.comment",
            "release_links.link.link_type.name",
            "release_links.link.link_type.gid",
            "release_links.link.attributes.attribute_type.name",
            "release_links.link.attributes.attribute_type.gid",
        ]))
}

fn work() -> EntityDescriptor {
    EntityDescriptor::new("work", BOOST, serializer())
        .with_fields(vec![
            field("mbid", "gid"),
            field("work", "name"),
            field("alias", "aliases.name"),
            field("arid", "artist_links.artist.gid"),
            field("artist", "artist_links.artist.name"),
            field("comment", "comment"),
            field("iswc", "iswcs.iswc"),
            field("lang", "languages.language.iso_code_3"),
            field("recording", "recording_links.recording.name"),
            field("recording_count", "recording_count")
                .with_transform(Transform::IntegerSum)
                .no_trigger(),
            field("rid", "recording_links.recording.gid"),
            field("tag", "tags.tag.name"),
            field("type", "type.name"),
        ])
        .with_extra_paths(paths(&[
            "aliases.type.name",
            "aliases.type.id",
            "aliases.type.gid",
            "aliases.sort_name",
            "aliases.locale",
            "aliases.primary_for_locale",
            "aliases.begin_date",
            "aliases.end_date",
            "artist_links.link.link_type.name",
            "artist_links.link.link_type.gid",
            "artist_links.link.attributes.attribute_type.name",
            "artist_links.link.attributes.attribute_type.gid",
            "recording_links.link.link_type.name",
            "recording_links.link.link_type.gid",
            "recording_links.link.attributes.attribute_type.name",
            "recording_links.link.attributes.attribute_type.gid",
            "recording_links.recording.video",
            "tags.count",
            "type.gid",
        ]))
}

/// Every core, keyed the way `spec.md` §3 and `reindex --help` expect:
/// sorted core names, `release-group` hyphenated per the original schema.
pub fn entities() -> Vec<(String, EntityDescriptor)> {
    vec![
        ("annotation".to_string(), annotation()),
        ("artist".to_string(), artist()),
        ("area".to_string(), area()),
        ("cdstub".to_string(), cdstub()),
        ("editor".to_string(), editor()),
        ("event".to_string(), event()),
        ("instrument".to_string(), instrument()),
        ("label".to_string(), label()),
        ("place".to_string(), place()),
        ("recording".to_string(), recording()),
        ("release".to_string(), release()),
        ("release-group".to_string(), release_group()),
        ("series".to_string(), series()),
        ("tag".to_string(), tag()),
        ("url".to_string(), url()),
        ("work".to_string(), work()),
    ]
}
