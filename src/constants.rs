/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 14/10/26
******************************************************************************/

pub const API_KEY_PARAM: &str = "api_key";
pub const API_SIG_PARAM: &str = "api_sig";
pub const AUTH_TOKEN_PARAM: &str = "auth_token";
pub const FROB_PARAM: &str = "frob";
pub const PERMS_PARAM: &str = "perms";
pub const METHOD_PARAM: &str = "method";

pub const METHOD_GET_FROB: &str = "flickr.auth.getFrob";
pub const METHOD_GET_TOKEN: &str = "flickr.auth.getToken";
pub const METHOD_CHECK_TOKEN: &str = "flickr.auth.checkToken";

pub const PHOTO_FIELD: &str = "photo";
pub const REQUESTED_PERMS: &str = "write";

pub const DEFAULT_BASE_URL: &str = "https://flickr.com/services";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SLEEP_TIME_SECS: u64 = 60;
pub const DEFAULT_HISTORY_FILE: &str = "uploadr.history";
pub const DEFAULT_TOKEN_FILE: &str = ".flickrToken";
pub const DEFAULT_TAGS: &str = "uploadr";
