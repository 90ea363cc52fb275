//! Backing model graph for the `musicbrainz` schema fixture.
//!
//! Transcribed from `original_source/sir/schema/__init__.py` and the
//! `mbdata` ORM models it walks: every model kind, relationship, column and
//! composite referenced by the field/extra-path declarations in
//! [`super::entities`]. Data-driven rather than hand-chained so ~90 model
//! kinds and ~130 relationships stay reviewable; see `DESIGN.md`.

use mbsearch_model::{Graph, GraphBuilder};

pub fn build() -> Graph {
    let mut b = GraphBuilder::new();

    for (kind, table) in ENTITY_TABLES {
        b = b.entity(*kind, *table);
    }
    for (kind, cols) in COLUMNS {
        for col in *cols {
            b = b.column(*kind, *col);
        }
    }
    for (kind, name, cols) in COMPOSITES {
        b = b.composite(*kind, *name, cols.iter().map(|s| s.to_string()).collect());
    }
    for (from, name, to, local_column) in MANY_TO_ONE {
        b = b.many_to_one(*from, *name, *to, *local_column);
    }
    for (from, name, to, remote_column) in TO_MANY {
        b = b.to_many(*from, *name, *to, *remote_column);
    }

    b.build()
}

const ENTITY_TABLES: &[(&str, &str)] = &[
    ("area", "area"),
    ("area_alias", "area_alias"),
    ("area_alias_type", "area_alias_type"),
    ("area_type", "area_type"),
    ("iso_3166_1", "iso_3166_1"),
    ("iso_3166_2", "iso_3166_2"),
    ("iso_3166_3", "iso_3166_3"),
    ("area_tag", "area_tag"),
    ("tag", "tag"),
    ("area_link", "l_area_area"),
    ("link", "link"),
    ("link_type", "link_type"),
    ("link_attribute", "link_attribute"),
    ("link_attribute_type", "link_attribute_type"),
    ("artist", "artist"),
    ("artist_alias", "artist_alias"),
    ("artist_alias_type", "artist_alias_type"),
    ("artist_type", "artist_type"),
    ("gender", "gender"),
    ("artist_ipi", "artist_ipi"),
    ("artist_isni", "artist_isni"),
    ("artist_tag", "artist_tag"),
    ("artist_credit", "artist_credit"),
    ("artist_credit_name", "artist_credit_name"),
    ("release_raw", "release_raw"),
    ("release_raw_discid", "release_raw_discid"),
    ("editor", "editor"),
    ("event", "event"),
    ("event_alias", "event_alias"),
    ("event_alias_type", "event_alias_type"),
    ("event_type", "event_type"),
    ("event_tag", "event_tag"),
    ("l_area_event", "l_area_event"),
    ("l_artist_event", "l_artist_event"),
    ("l_event_place", "l_event_place"),
    ("instrument", "instrument"),
    ("instrument_alias", "instrument_alias"),
    ("instrument_alias_type", "instrument_alias_type"),
    ("instrument_type", "instrument_type"),
    ("instrument_tag", "instrument_tag"),
    ("label", "label"),
    ("label_alias", "label_alias"),
    ("label_alias_type", "label_alias_type"),
    ("label_type", "label_type"),
    ("label_ipi", "label_ipi"),
    ("label_isni", "label_isni"),
    ("label_tag", "label_tag"),
    ("place", "place"),
    ("place_alias", "place_alias"),
    ("place_alias_type", "place_alias_type"),
    ("place_type", "place_type"),
    ("recording", "recording"),
    ("recording_alias", "recording_alias"),
    ("recording_tag", "recording_tag"),
    ("isrc", "isrc"),
    ("track", "track"),
    ("medium", "medium"),
    ("medium_format", "medium_format"),
    ("medium_cdtoc", "medium_cdtoc"),
    ("release", "release"),
    ("release_alias", "release_alias"),
    ("release_country", "release_country"),
    ("country_area", "country_area"),
    ("release_label", "release_label"),
    ("release_coverart", "release_coverart"),
    ("release_packaging", "release_packaging"),
    ("release_status", "release_status"),
    ("script", "script"),
    ("language", "language"),
    ("release_tag", "release_tag"),
    ("release_group", "release_group"),
    ("release_group_alias", "release_group_alias"),
    ("release_group_primary_type", "release_group_primary_type"),
    ("release_group_secondary_type_join", "release_group_secondary_type_join"),
    ("release_group_secondary_type", "release_group_secondary_type"),
    ("release_group_tag", "release_group_tag"),
    ("series", "series"),
    ("series_alias", "series_alias"),
    ("series_alias_type", "series_alias_type"),
    ("series_type", "series_type"),
    ("series_tag", "series_tag"),
    ("url", "url"),
    ("l_artist_url", "l_artist_url"),
    ("l_release_url", "l_release_url"),
    ("work", "work"),
    ("work_alias", "work_alias"),
    ("work_alias_type", "work_alias_type"),
    ("work_type", "work_type"),
    ("work_tag", "work_tag"),
    ("l_artist_work", "l_artist_work"),
    ("l_recording_work", "l_recording_work"),
    ("work_language", "work_language"),
    ("work_iswc", "work_iswc"),
    ("annotation", "annotation"),
    ("area_annotation", "area_annotation"),
    ("artist_annotation", "artist_annotation"),
    ("event_annotation", "event_annotation"),
    ("instrument_annotation", "instrument_annotation"),
    ("label_annotation", "label_annotation"),
    ("place_annotation", "place_annotation"),
    ("recording_annotation", "recording_annotation"),
    ("release_annotation", "release_annotation"),
    ("release_group_annotation", "release_group_annotation"),
    ("series_annotation", "series_annotation"),
    ("work_annotation", "work_annotation"),
];

const COLUMNS: &[(&str, &[&str])] = &[
    ("area", &["name", "gid", "comment", "begin_date", "end_date", "ended", "place_count", "label_count", "artist_count"]),
    ("area_alias", &["name", "sort_name", "locale", "primary_for_locale", "begin_date", "end_date"]),
    ("area_alias_type", &["name", "id", "gid"]),
    ("area_type", &["name", "gid"]),
    ("iso_3166_1", &["code"]),
    ("iso_3166_2", &["code"]),
    ("iso_3166_3", &["code"]),
    ("area_tag", &["count"]),
    ("tag", &["name", "id"]),
    ("area_link", &["begin_date", "end_date"]),
    ("link_type", &["name", "gid"]),
    ("link_attribute_type", &["name", "gid"]),
    ("artist", &["gid", "name", "sort_name", "comment", "begin_date", "end_date", "ended"]),
    ("artist_alias", &["name", "sort_name", "locale", "primary_for_locale", "begin_date", "end_date"]),
    ("artist_alias_type", &["name", "id", "gid"]),
    ("artist_type", &["name"]),
    ("gender", &["name", "gid"]),
    ("artist_ipi", &["ipi"]),
    ("artist_isni", &["isni"]),
    ("artist_tag", &["count"]),
    ("artist_credit", &["name", "ref_count"]),
    ("artist_credit_name", &["name", "join_phrase"]),
    ("release_raw", &["id", "title", "artist", "comment", "barcode", "added"]),
    ("release_raw_discid", &["track_count", "discid"]),
    ("editor", &["id", "bio", "name"]),
    ("event", &["gid", "name", "comment", "begin_date", "end_date", "ended", "time"]),
    ("event_alias", &["name", "sort_name", "locale", "primary_for_locale", "begin_date", "end_date"]),
    ("event_alias_type", &["name", "id", "gid"]),
    ("event_type", &["name"]),
    ("event_tag", &["count"]),
    ("instrument", &["gid", "name", "comment", "description"]),
    ("instrument_alias", &["name", "sort_name", "locale", "primary_for_locale", "begin_date", "end_date"]),
    ("instrument_alias_type", &["name", "id", "gid"]),
    ("instrument_type", &["name"]),
    ("instrument_tag", &["count"]),
    ("label", &["gid", "name", "comment", "begin_date", "end_date", "ended", "label_code", "release_count"]),
    ("label_alias", &["name", "sort_name", "locale", "primary_for_locale", "begin_date", "end_date"]),
    ("label_alias_type", &["name", "id", "gid"]),
    ("label_type", &["name"]),
    ("label_ipi", &["ipi"]),
    ("label_isni", &["isni"]),
    ("label_tag", &["count"]),
    ("place", &["gid", "name", "comment", "address", "coordinates", "begin_date", "end_date", "ended"]),
    ("place_alias", &["name", "sort_name", "locale", "primary_for_locale", "begin_date", "end_date"]),
    ("place_alias_type", &["name", "id", "gid"]),
    ("place_type", &["name"]),
    ("recording", &["gid", "name", "comment", "length", "video"]),
    ("recording_alias", &["name"]),
    ("recording_tag", &["count"]),
    ("isrc", &["isrc"]),
    ("track", &["gid", "name", "position", "number", "length"]),
    ("medium", &["position", "track_count"]),
    ("medium_format", &["name"]),
    ("medium_cdtoc", &["id"]),
    ("release", &["gid", "name", "comment", "barcode", "quality", "medium_count"]),
    ("release_alias", &["name"]),
    ("release_country", &["date_day", "date_month", "date_year"]),
    ("release_label", &["catalog_number"]),
    ("release_coverart", &["amazon_asin"]),
    ("release_packaging", &["name"]),
    ("release_status", &["name", "gid"]),
    ("script", &["iso_code"]),
    ("language", &["iso_code_3"]),
    ("release_tag", &["count"]),
    ("release_group", &["gid", "name", "comment", "release_count"]),
    ("release_group_alias", &["name"]),
    ("release_group_primary_type", &["name", "gid"]),
    ("release_group_secondary_type", &["name", "gid"]),
    ("release_group_tag", &["count"]),
    ("series", &["gid", "name", "comment"]),
    ("series_alias", &["name", "sort_name", "locale", "primary_for_locale", "begin_date", "end_date"]),
    ("series_alias_type", &["name", "id", "gid"]),
    ("series_type", &["name"]),
    ("series_tag", &["count"]),
    ("url", &["gid", "url"]),
    ("work", &["gid", "name", "comment"]),
    ("work_alias", &["name", "sort_name", "locale", "primary_for_locale", "begin_date", "end_date"]),
    ("work_alias_type", &["name", "id", "gid"]),
    ("work_type", &["name"]),
    ("work_tag", &["count"]),
    ("work_iswc", &["iswc"]),
    ("annotation", &["id", "text"]),
];

const COMPOSITES: &[(&str, &str, &[&str])] = &[
    ("area", "begin_date", &["begin_date_year", "begin_date_month", "begin_date_day"]),
    ("area", "end_date", &["end_date_year", "end_date_month", "end_date_day"]),
    ("artist", "begin_date", &["begin_date_year", "begin_date_month", "begin_date_day"]),
    ("artist", "end_date", &["end_date_year", "end_date_month", "end_date_day"]),
    ("event", "begin_date", &["begin_date_year", "begin_date_month", "begin_date_day"]),
    ("event", "end_date", &["end_date_year", "end_date_month", "end_date_day"]),
    ("label", "begin_date", &["begin_date_year", "begin_date_month", "begin_date_day"]),
    ("label", "end_date", &["end_date_year", "end_date_month", "end_date_day"]),
    ("place", "begin_date", &["begin_date_year", "begin_date_month", "begin_date_day"]),
    ("place", "end_date", &["end_date_year", "end_date_month", "end_date_day"]),
    ("place", "coordinates", &["latitude", "longitude"]),
    ("area_alias", "begin_date", &["begin_date_year", "begin_date_month", "begin_date_day"]),
    ("area_alias", "end_date", &["end_date_year", "end_date_month", "end_date_day"]),
    ("artist_alias", "begin_date", &["begin_date_year", "begin_date_month", "begin_date_day"]),
    ("artist_alias", "end_date", &["end_date_year", "end_date_month", "end_date_day"]),
    ("release_country", "date", &["date_year", "date_month", "date_day"]),
];

const MANY_TO_ONE: &[(&str, &str, &str, &str)] = &[
    ("area", "type", "area_type", "type"),
    ("area_alias", "area", "area", "area"),
    ("area_alias", "type", "area_alias_type", "type"),
    ("area_tag", "tag", "tag", "tag"),
    ("area_tag", "area", "area", "area"),
    ("area_link", "area0", "area", "entity0"),
    ("area_link", "link", "link", "link"),
    ("link", "link_type", "link_type", "link_type"),
    ("link_attribute", "link", "link", "link"),
    ("link_attribute", "attribute_type", "link_attribute_type", "attribute_type"),
    ("iso_3166_1", "area", "area", "area"),
    ("iso_3166_2", "area", "area", "area"),
    ("iso_3166_3", "area", "area", "area"),
    ("artist", "area", "area", "area"),
    ("artist", "begin_area", "area", "begin_area"),
    ("artist", "end_area", "area", "end_area"),
    ("artist", "gender", "gender", "gender"),
    ("artist", "type", "artist_type", "type"),
    ("artist_alias", "artist", "artist", "artist"),
    ("artist_alias", "type", "artist_alias_type", "type"),
    ("artist_tag", "tag", "tag", "tag"),
    ("artist_tag", "artist", "artist", "artist"),
    ("artist_ipi", "artist", "artist", "artist"),
    ("artist_isni", "artist", "artist", "artist"),
    ("artist_credit_name", "artist_credit", "artist_credit", "artist_credit"),
    ("artist_credit_name", "artist", "artist", "artist"),
    ("release_raw_discid", "release_raw", "release_raw", "release_raw"),
    ("event", "type", "event_type", "type"),
    ("event_alias", "event", "event", "event"),
    ("event_alias", "type", "event_alias_type", "type"),
    ("event_tag", "tag", "tag", "tag"),
    ("event_tag", "event", "event", "event"),
    ("l_area_event", "entity0", "area", "entity0"),
    ("l_area_event", "area", "area", "entity0"),
    ("l_area_event", "link", "link", "link"),
    ("l_artist_event", "entity0", "artist", "entity0"),
    ("l_artist_event", "artist", "artist", "entity0"),
    ("l_artist_event", "link", "link", "link"),
    ("l_event_place", "entity1", "place", "entity1"),
    ("l_event_place", "place", "place", "entity1"),
    ("l_event_place", "link", "link", "link"),
    ("instrument", "type", "instrument_type", "type"),
    ("instrument_alias", "instrument", "instrument", "instrument"),
    ("instrument_alias", "type", "instrument_alias_type", "type"),
    ("instrument_tag", "tag", "tag", "tag"),
    ("instrument_tag", "instrument", "instrument", "instrument"),
    ("label", "area", "area", "area"),
    ("label", "type", "label_type", "type"),
    ("label_alias", "label", "label", "label"),
    ("label_alias", "type", "label_alias_type", "type"),
    ("label_tag", "tag", "tag", "tag"),
    ("label_tag", "label", "label", "label"),
    ("label_ipi", "label", "label", "label"),
    ("label_isni", "label", "label", "label"),
    ("place", "area", "area", "area"),
    ("place", "type", "place_type", "type"),
    ("place_alias", "place", "place", "place"),
    ("place_alias", "type", "place_alias_type", "type"),
    ("recording", "artist_credit", "artist_credit", "artist_credit"),
    ("recording_alias", "recording", "recording", "recording"),
    ("recording_tag", "tag", "tag", "tag"),
    ("recording_tag", "recording", "recording", "recording"),
    ("isrc", "recording", "recording", "recording"),
    ("track", "medium", "medium", "medium"),
    ("track", "recording", "recording", "recording"),
    ("medium", "release", "release", "release"),
    ("medium", "format", "medium_format", "format"),
    ("medium_cdtoc", "medium", "medium", "medium"),
    ("release", "artist_credit", "artist_credit", "artist_credit"),
    ("release_alias", "release", "release", "release"),
    ("release", "asin", "release_coverart", "release"),
    ("release", "language", "language", "language"),
    ("release", "packaging", "release_packaging", "packaging"),
    ("release", "release_group", "release_group", "release_group"),
    ("release", "script", "script", "script"),
    ("release", "status", "release_status", "status"),
    ("release_tag", "tag", "tag", "tag"),
    ("release_tag", "release", "release", "release"),
    ("release_country", "country", "country_area", "country"),
    ("release_country", "release", "release", "release"),
    ("country_area", "area", "area", "area"),
    ("release_label", "label", "label", "label"),
    ("release_label", "release", "release", "release"),
    ("release_group", "artist_credit", "artist_credit", "artist_credit"),
    ("release_group_alias", "release_group", "release_group", "release_group"),
    ("release_group", "type", "release_group_primary_type", "type"),
    ("release_group_tag", "tag", "tag", "tag"),
    ("release_group_tag", "release_group", "release_group", "release_group"),
    ("release_group_secondary_type_join", "secondary_type", "release_group_secondary_type", "secondary_type"),
    ("release_group_secondary_type_join", "release_group", "release_group", "release_group"),
    ("release", "release_group", "release_group", "release_group"),
    ("series", "link_attribute_type", "link_attribute_type", "ordering_attribute"),
    ("series", "type", "series_type", "type"),
    ("series_alias", "series", "series", "series"),
    ("series_alias", "type", "series_alias_type", "type"),
    ("series_tag", "tag", "tag", "tag"),
    ("series_tag", "series", "series", "series"),
    ("l_artist_url", "artist", "artist", "entity0"),
    ("l_artist_url", "link", "link", "link"),
    ("l_artist_url", "url", "url", "entity1"),
    ("l_release_url", "release", "release", "entity0"),
    ("l_release_url", "link", "link", "link"),
    ("l_release_url", "url", "url", "entity1"),
    ("work", "type", "work_type", "type"),
    ("work_alias", "work", "work", "work"),
    ("work_alias", "type", "work_alias_type", "type"),
    ("work_tag", "tag", "tag", "tag"),
    ("work_tag", "work", "work", "work"),
    ("l_artist_work", "artist", "artist", "entity0"),
    ("l_artist_work", "link", "link", "link"),
    ("l_artist_work", "work", "work", "entity1"),
    ("l_recording_work", "recording", "recording", "entity0"),
    ("l_recording_work", "link", "link", "link"),
    ("l_recording_work", "work", "work", "entity1"),
    ("work_language", "language", "language", "language"),
    ("work_language", "work", "work", "work"),
    ("work_iswc", "work", "work", "work"),
    ("area_annotation", "area", "area", "area"),
    ("area_annotation", "annotation", "annotation", "annotation"),
    ("artist_annotation", "artist", "artist", "artist"),
    ("artist_annotation", "annotation", "annotation", "annotation"),
    ("event_annotation", "event", "event", "event"),
    ("event_annotation", "annotation", "annotation", "annotation"),
    ("instrument_annotation", "instrument", "instrument", "instrument"),
    ("instrument_annotation", "annotation", "annotation", "annotation"),
    ("label_annotation", "label", "label", "label"),
    ("label_annotation", "annotation", "annotation", "annotation"),
    ("place_annotation", "place", "place", "place"),
    ("place_annotation", "annotation", "annotation", "annotation"),
    ("recording_annotation", "recording", "recording", "recording"),
    ("recording_annotation", "annotation", "annotation", "annotation"),
    ("release_annotation", "release", "release", "release"),
    ("release_annotation", "annotation", "annotation", "annotation"),
    ("release_group_annotation", "release_group", "release_group", "release_group"),
    ("release_group_annotation", "annotation", "annotation", "annotation"),
    ("series_annotation", "series", "series", "series"),
    ("series_annotation", "annotation", "annotation", "annotation"),
    ("work_annotation", "work", "work", "work"),
    ("work_annotation", "annotation", "annotation", "annotation"),
];

const TO_MANY: &[(&str, &str, &str, &str)] = &[
    ("area", "aliases", "area_alias", "area"),
    ("area", "iso_3166_1_codes", "iso_3166_1", "area"),
    ("area", "iso_3166_2_codes", "iso_3166_2", "area"),
    ("area", "iso_3166_3_codes", "iso_3166_3", "area"),
    ("area", "tags", "area_tag", "area"),
    ("area", "area_links", "area_link", "entity0"),
    ("link", "attributes", "link_attribute", "link"),
    ("artist", "aliases", "artist_alias", "artist"),
    ("artist", "primary_aliases", "artist_alias", "artist"),
    ("artist", "artist_credit_names", "artist_credit_name", "artist"),
    ("artist", "ipis", "artist_ipi", "artist"),
    ("artist", "isnis", "artist_isni", "artist"),
    ("artist", "tags", "artist_tag", "artist"),
    ("artist_credit", "artists", "artist_credit_name", "artist_credit"),
    ("release_raw", "discids", "release_raw_discid", "release_raw"),
    ("event", "aliases", "event_alias", "event"),
    ("event", "area_links", "l_area_event", "entity1"),
    ("event", "artist_links", "l_artist_event", "entity1"),
    ("event", "place_links", "l_event_place", "entity0"),
    ("event", "tags", "event_tag", "event"),
    ("instrument", "aliases", "instrument_alias", "instrument"),
    ("instrument", "tags", "instrument_tag", "instrument"),
    ("label", "aliases", "label_alias", "label"),
    ("label", "ipis", "label_ipi", "label"),
    ("label", "isnis", "label_isni", "label"),
    ("label", "tags", "label_tag", "label"),
    ("place", "aliases", "place_alias", "place"),
    ("recording", "aliases", "recording_alias", "recording"),
    ("recording", "isrcs", "isrc", "recording"),
    ("recording", "tags", "recording_tag", "recording"),
    ("recording", "tracks", "track", "recording"),
    ("medium", "cdtocs", "medium_cdtoc", "medium"),
    ("release", "aliases", "release_alias", "release"),
    ("release", "country_dates", "release_country", "release"),
    ("release", "labels", "release_label", "release"),
    ("release", "mediums", "medium", "release"),
    ("release", "tags", "release_tag", "release"),
    ("release_group", "aliases", "release_group_alias", "release_group"),
    ("release_group", "releases", "release", "release_group"),
    ("release_group", "secondary_types", "release_group_secondary_type_join", "release_group"),
    ("release_group", "tags", "release_group_tag", "release_group"),
    ("series", "aliases", "series_alias", "series"),
    ("series", "tags", "series_tag", "series"),
    ("url", "artist_links", "l_artist_url", "entity1"),
    ("url", "release_links", "l_release_url", "entity1"),
    ("work", "aliases", "work_alias", "work"),
    ("work", "artist_links", "l_artist_work", "entity1"),
    ("work", "recording_links", "l_recording_work", "entity1"),
    ("work", "languages", "work_language", "work"),
    ("work", "iswcs", "work_iswc", "work"),
    ("work", "tags", "work_tag", "work"),
    ("annotation", "areas", "area_annotation", "annotation"),
    ("annotation", "artists", "artist_annotation", "annotation"),
    ("annotation", "events", "event_annotation", "annotation"),
    ("annotation", "instruments", "instrument_annotation", "annotation"),
    ("annotation", "labels", "label_annotation", "annotation"),
    ("annotation", "places", "place_annotation", "annotation"),
    ("annotation", "recordings", "recording_annotation", "annotation"),
    ("annotation", "releases", "release_annotation", "annotation"),
    ("annotation", "release_groups", "release_group_annotation", "annotation"),
    ("annotation", "series", "series_annotation", "annotation"),
    ("annotation", "works", "work_annotation", "annotation"),
];
