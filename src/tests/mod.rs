//! nmea-satview lib test modules
